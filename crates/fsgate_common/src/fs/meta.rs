use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use fsgate_domain::FileMeta;

impl crate::fs::FsGateFS {
    /// Reports whether `path` exists. A missing path is `Ok(false)`; other
    /// failures such as permission errors are returned.
    pub async fn exists(path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        tokio::fs::try_exists(path)
            .await
            .with_context(|| format!("Failed to check existence of {}", path.display()))
    }

    pub async fn is_dir(path: impl AsRef<Path>) -> Result<bool> {
        Ok(Self::meta(path).await?.is_dir)
    }

    /// Reads metadata following symlinks and records the canonical path when
    /// it differs from `path`.
    pub async fn meta(path: impl AsRef<Path>) -> Result<FileMeta> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read metadata of {}", path.display()))?;

        let canonical = tokio::fs::canonicalize(path)
            .await
            .ok()
            .filter(|resolved| resolved != path);

        Ok(FileMeta {
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
            len: metadata.len(),
            mode: mode_of(&metadata),
            is_dir: metadata.is_dir(),
            canonical,
        })
    }

    pub async fn set_modified(path: impl AsRef<Path>, mtime: SystemTime) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new()
                .write(true)
                .open(&path)
                .with_context(|| format!("Failed to open file {}", path.display()))?;
            file.set_modified(mtime)
                .with_context(|| format!("Failed to set modification time of {}", path.display()))
        })
        .await?
    }
}

#[cfg(unix)]
fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o666 }
}
