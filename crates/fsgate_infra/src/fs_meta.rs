use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use fsgate_app::FileInfoInfra;
use fsgate_common::fs::FsGateFS;
use fsgate_domain::FileMeta;

pub struct FsGateFileMetaService;

#[async_trait::async_trait]
impl FileInfoInfra for FsGateFileMetaService {
    async fn exists(&self, path: &Path) -> Result<bool> {
        FsGateFS::exists(path).await
    }

    async fn meta(&self, path: &Path) -> Result<FileMeta> {
        FsGateFS::meta(path).await
    }

    async fn set_modified(&self, path: &Path, mtime: SystemTime) -> Result<()> {
        FsGateFS::set_modified(path, mtime).await
    }
}
