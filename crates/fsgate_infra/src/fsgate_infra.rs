use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use fsgate_app::{
    AssetInfra, DirectoryReaderInfra, DownloadInfra, EnvironmentInfra, FileDirectoryInfra,
    FileHashInfra, FileInfoInfra, FileReaderInfra, FileRemoverInfra, FileTransferInfra,
    FileWriterInfra,
};
use fsgate_domain::{DownloadJob, DownloadSignal, FileMeta, FsGateConfig, HashAlgorithm, WriteMode};
use tokio::sync::mpsc;

use crate::assets::FsGateAssetService;
use crate::env::FsGateEnvironmentInfra;
use crate::fs_create_dirs::FsGateCreateDirsService;
use crate::fs_hash::FsGateFileHashService;
use crate::fs_meta::FsGateFileMetaService;
use crate::fs_read::FsGateFileReadService;
use crate::fs_read_dir::FsGateDirectoryReaderService;
use crate::fs_remove::FsGateFileRemoveService;
use crate::fs_transfer::FsGateFileTransferService;
use crate::fs_write::FsGateFileWriteService;
use crate::http::FsGateHttpInfra;

/// The native provider: every provider trait backed by the local filesystem
/// and an HTTP client.
#[derive(Clone)]
pub struct FsGateInfra {
    file_read_service: Arc<FsGateFileReadService>,
    file_write_service: Arc<FsGateFileWriteService>,
    file_remove_service: Arc<FsGateFileRemoveService>,
    environment_service: Arc<FsGateEnvironmentInfra>,
    file_meta_service: Arc<FsGateFileMetaService>,
    create_dirs_service: Arc<FsGateCreateDirsService>,
    directory_reader_service: Arc<FsGateDirectoryReaderService>,
    file_transfer_service: Arc<FsGateFileTransferService>,
    file_hash_service: Arc<FsGateFileHashService>,
    asset_service: Arc<FsGateAssetService>,
    http_service: Arc<FsGateHttpInfra>,
}

impl FsGateInfra {
    pub fn new(config: FsGateConfig) -> Self {
        Self::with_environment(FsGateEnvironmentInfra::new(config))
    }

    /// Configuration read from `FSGATE_*` variables and an optional `.env`.
    pub fn from_env() -> Self {
        Self::with_environment(FsGateEnvironmentInfra::from_env())
    }

    fn with_environment(environment: FsGateEnvironmentInfra) -> Self {
        let config = environment.get_config();

        Self {
            file_read_service: Arc::new(FsGateFileReadService::new()),
            file_write_service: Arc::new(FsGateFileWriteService::new()),
            file_remove_service: Arc::new(FsGateFileRemoveService::new()),
            environment_service: Arc::new(environment),
            file_meta_service: Arc::new(FsGateFileMetaService),
            create_dirs_service: Arc::new(FsGateCreateDirsService),
            directory_reader_service: Arc::new(FsGateDirectoryReaderService),
            file_transfer_service: Arc::new(FsGateFileTransferService),
            file_hash_service: Arc::new(FsGateFileHashService),
            asset_service: Arc::new(FsGateAssetService::new(config.assets_root)),
            http_service: Arc::new(FsGateHttpInfra::new(config.download)),
        }
    }
}

impl EnvironmentInfra for FsGateInfra {
    fn get_config(&self) -> FsGateConfig {
        self.environment_service.get_config()
    }
}

#[async_trait::async_trait]
impl FileReaderInfra for FsGateInfra {
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.file_read_service.read(path).await
    }

    async fn range_read(&self, path: &Path, offset: u64, length: usize) -> anyhow::Result<Vec<u8>> {
        self.file_read_service.range_read(path, offset, length).await
    }
}

#[async_trait::async_trait]
impl FileWriterInfra for FsGateInfra {
    async fn write(&self, path: &Path, contents: Bytes, mode: WriteMode) -> anyhow::Result<()> {
        self.file_write_service.write(path, contents, mode).await
    }
}

#[async_trait::async_trait]
impl FileInfoInfra for FsGateInfra {
    async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.file_meta_service.exists(path).await
    }

    async fn meta(&self, path: &Path) -> anyhow::Result<FileMeta> {
        self.file_meta_service.meta(path).await
    }

    async fn set_modified(&self, path: &Path, mtime: SystemTime) -> anyhow::Result<()> {
        self.file_meta_service.set_modified(path, mtime).await
    }
}

#[async_trait::async_trait]
impl FileRemoverInfra for FsGateInfra {
    async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        self.file_remove_service.remove(path).await
    }
}

#[async_trait::async_trait]
impl FileDirectoryInfra for FsGateInfra {
    async fn create_dirs(&self, path: &Path) -> anyhow::Result<()> {
        self.create_dirs_service.create_dirs(path).await
    }

    async fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        self.create_dirs_service.create_dir(path).await
    }
}

#[async_trait::async_trait]
impl DirectoryReaderInfra for FsGateInfra {
    async fn list_directory_entries(
        &self,
        directory: &Path,
    ) -> anyhow::Result<Vec<(PathBuf, bool)>> {
        self.directory_reader_service
            .list_directory_entries(directory)
            .await
    }
}

#[async_trait::async_trait]
impl FileTransferInfra for FsGateInfra {
    async fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        self.file_transfer_service.copy(from, to).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        self.file_transfer_service.rename(from, to).await
    }
}

#[async_trait::async_trait]
impl FileHashInfra for FsGateInfra {
    async fn digest(&self, path: &Path, algorithm: HashAlgorithm) -> anyhow::Result<String> {
        self.file_hash_service.digest(path, algorithm).await
    }
}

#[async_trait::async_trait]
impl AssetInfra for FsGateInfra {
    async fn read_asset(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.asset_service.read_asset(path).await
    }

    async fn asset_exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.asset_service.asset_exists(path).await
    }
}

#[async_trait::async_trait]
impl DownloadInfra for FsGateInfra {
    async fn submit(&self, job: DownloadJob) -> anyhow::Result<mpsc::Receiver<DownloadSignal>> {
        self.http_service.submit(job).await
    }
}
