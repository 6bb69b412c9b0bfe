use std::path::Path;

use fsgate_app::FileDirectoryInfra;
use fsgate_common::fs::FsGateFS;

#[derive(Default)]
pub struct FsGateCreateDirsService;

#[async_trait::async_trait]
impl FileDirectoryInfra for FsGateCreateDirsService {
    async fn create_dirs(&self, path: &Path) -> anyhow::Result<()> {
        FsGateFS::create_dir_all(path).await
    }

    async fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        FsGateFS::create_dir(path).await
    }
}
