use std::path::Path;

use fsgate_app::FileTransferInfra;
use fsgate_common::fs::FsGateFS;
use tracing::debug;

#[derive(Default)]
pub struct FsGateFileTransferService;

#[async_trait::async_trait]
impl FileTransferInfra for FsGateFileTransferService {
    async fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        let bytes = FsGateFS::copy(from, to).await?;
        debug!(from = %from.display(), to = %to.display(), bytes, "Copied file");
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        FsGateFS::rename(from, to).await
    }
}
