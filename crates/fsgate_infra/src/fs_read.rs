use std::path::Path;

use anyhow::Result;
use fsgate_app::FileReaderInfra;
use fsgate_common::fs::FsGateFS;

#[derive(Default)]
pub struct FsGateFileReadService;

impl FsGateFileReadService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl FileReaderInfra for FsGateFileReadService {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        FsGateFS::read(path).await
    }

    async fn range_read(&self, path: &Path, offset: u64, length: usize) -> Result<Vec<u8>> {
        FsGateFS::read_range(path, offset, length).await
    }
}
