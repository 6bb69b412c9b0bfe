use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

impl crate::fs::FsGateFS {
    pub async fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
        let (from, to) = (from.as_ref(), to.as_ref());
        tokio::fs::copy(from, to)
            .await
            .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))
    }

    /// Renames `from` to `to`, falling back to copy and delete when the two
    /// paths live on different devices.
    pub async fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
        let (from, to) = (from.as_ref(), to.as_ref());
        match tokio::fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::CrossesDevices => {
                debug!(from = %from.display(), to = %to.display(), "Rename crosses devices, copying");
                Self::copy(from, to).await?;
                Self::remove(from).await
            }
            Err(err) => Err(err).with_context(|| {
                format!("Failed to move {} to {}", from.display(), to.display())
            }),
        }
    }
}
