use std::path::Path;

use bytes::Bytes;
use fsgate_app::FileWriterInfra;
use fsgate_common::fs::FsGateFS;
use fsgate_domain::WriteMode;

/// Low-level file write service
///
/// Writes exactly where it is told to. Parent directories are the caller's
/// concern; a missing parent surfaces as the io error of the open call.
#[derive(Default)]
pub struct FsGateFileWriteService;

impl FsGateFileWriteService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl FileWriterInfra for FsGateFileWriteService {
    async fn write(&self, path: &Path, contents: Bytes, mode: WriteMode) -> anyhow::Result<()> {
        FsGateFS::write(path, &contents, mode).await
    }
}
