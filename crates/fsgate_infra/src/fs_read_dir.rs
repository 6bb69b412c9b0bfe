use std::path::{Path, PathBuf};

use fsgate_app::DirectoryReaderInfra;
use fsgate_common::fs::FsGateFS;

pub struct FsGateDirectoryReaderService;

#[async_trait::async_trait]
impl DirectoryReaderInfra for FsGateDirectoryReaderService {
    async fn list_directory_entries(
        &self,
        directory: &Path,
    ) -> anyhow::Result<Vec<(PathBuf, bool)>> {
        FsGateFS::list_dir(directory).await
    }
}
