use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use fsgate_app::transcode::{decode, encode};
use fsgate_app::{
    AssetInfra, DirectoryReaderInfra, DownloadHandle, DownloadInfra, EnvironmentInfra,
    FileDirectoryInfra, FileHashInfra, FileInfoInfra, FileReaderInfra, FileRemoverInfra,
    FileTransferInfra, FileWriterInfra, NativeFileService,
};
use fsgate_domain::{Constants, DirEntry, DownloadJob, StatResult, WriteMode};

use crate::constants::FsGateConstantsService;
use crate::dir_list::FsGateDirLister;
use crate::download::FsGateDownloadCoordinator;
use crate::file_ops::FsGateFileOps;
use crate::hash::FsGateHasher;

/// FsGateServices is the facade container implementing `NativeFileService`.
/// Payloads are decoded from base64 on the way in and encoded on the way out
/// here, and nowhere else.
///
/// Type Parameters:
/// - F: The provider implementation supplying filesystem, hashing, asset and
///   network access.
pub struct FsGateServices<F> {
    constants_service: FsGateConstantsService<F>,
    file_ops: Arc<FsGateFileOps<F>>,
    hasher: FsGateHasher<F>,
    dir_lister: FsGateDirLister<F>,
    downloads: FsGateDownloadCoordinator<F>,
}

impl<F> FsGateServices<F>
where
    F: EnvironmentInfra
        + FileReaderInfra
        + FileWriterInfra
        + FileInfoInfra
        + FileRemoverInfra
        + FileDirectoryInfra
        + FileTransferInfra
        + FileHashInfra
        + DirectoryReaderInfra
        + AssetInfra
        + DownloadInfra,
{
    pub fn new(infra: Arc<F>) -> Self {
        let file_ops = Arc::new(FsGateFileOps::new(infra.clone()));
        Self {
            constants_service: FsGateConstantsService::new(infra.clone()),
            hasher: FsGateHasher::new(infra.clone()),
            dir_lister: FsGateDirLister::new(infra.clone(), file_ops.clone()),
            downloads: FsGateDownloadCoordinator::new(infra),
            file_ops,
        }
    }

    pub fn downloads(&self) -> &FsGateDownloadCoordinator<F> {
        &self.downloads
    }
}

#[async_trait::async_trait]
impl<F> NativeFileService for FsGateServices<F>
where
    F: EnvironmentInfra
        + FileReaderInfra
        + FileWriterInfra
        + FileInfoInfra
        + FileRemoverInfra
        + FileDirectoryInfra
        + FileTransferInfra
        + FileHashInfra
        + DirectoryReaderInfra
        + AssetInfra
        + DownloadInfra
        + 'static,
{
    fn get_constants(&self) -> Constants {
        self.constants_service.get_constants()
    }

    async fn read_file(&self, path: &Path) -> anyhow::Result<String> {
        Ok(encode(self.file_ops.read(path).await?))
    }

    async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.file_ops.exists(path).await
    }

    async fn mkdir(&self, path: &Path) -> anyhow::Result<()> {
        self.file_ops.mkdir(path).await
    }

    async fn write_file(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        let bytes = Bytes::from(decode(contents)?);
        self.file_ops.write(path, bytes, WriteMode::Overwrite).await
    }

    async fn append_file(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        let bytes = Bytes::from(decode(contents)?);
        self.file_ops.write(path, bytes, WriteMode::Append).await
    }

    async fn read_file_assets(&self, path: &Path) -> anyhow::Result<String> {
        Ok(encode(self.file_ops.read_asset(path).await?))
    }

    async fn exists_assets(&self, path: &Path) -> anyhow::Result<bool> {
        self.file_ops.asset_exists(path).await
    }

    async fn copy_file(&self, from: &Path, into: &Path) -> anyhow::Result<()> {
        self.file_ops.copy(from, into).await
    }

    async fn move_file(&self, from: &Path, into: &Path) -> anyhow::Result<()> {
        self.file_ops.rename(from, into).await
    }

    async fn unlink(&self, path: &Path) -> anyhow::Result<()> {
        self.file_ops.remove(path).await
    }

    async fn hash(&self, path: &Path, algorithm: &str) -> anyhow::Result<String> {
        self.hasher.hash(path, algorithm).await
    }

    async fn read(&self, path: &Path, length: usize, position: u64) -> anyhow::Result<String> {
        Ok(encode(self.file_ops.read_range(path, length, position).await?))
    }

    async fn write(&self, path: &Path, contents: &str, position: i64) -> anyhow::Result<()> {
        let bytes = Bytes::from(decode(contents)?);
        let mode = u64::try_from(position).map_or(WriteMode::Append, WriteMode::At);
        self.file_ops.write(path, bytes, mode).await
    }

    async fn touch(&self, path: &Path, mtime: Option<DateTime<Utc>>) -> anyhow::Result<bool> {
        self.file_ops.touch(path, mtime).await
    }

    async fn stat(&self, path: &Path) -> anyhow::Result<StatResult> {
        self.file_ops.stat(path).await
    }

    async fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<DirEntry>> {
        self.dir_lister.read_dir(path).await
    }

    async fn download_file(&self, job: DownloadJob) -> anyhow::Result<DownloadHandle> {
        self.downloads.download(job).await
    }
}
