use std::path::Path;

use fsgate_app::FileRemoverInfra;
use fsgate_common::fs::FsGateFS;

/// Removes files, and directories together with their contents.
#[derive(Default)]
pub struct FsGateFileRemoveService;

impl FsGateFileRemoveService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl FileRemoverInfra for FsGateFileRemoveService {
    async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        FsGateFS::remove(path).await
    }
}
