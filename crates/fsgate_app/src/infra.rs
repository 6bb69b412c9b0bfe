use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use fsgate_domain::{DownloadJob, DownloadSignal, FileMeta, FsGateConfig, HashAlgorithm, WriteMode};
use tokio::sync::mpsc;

pub trait EnvironmentInfra: Send + Sync {
    fn get_config(&self) -> FsGateConfig;
}

#[async_trait::async_trait]
pub trait FileReaderInfra: Send + Sync {
    /// Reads the whole file as raw bytes.
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>>;

    /// Reads up to `length` bytes from `offset`; near end of file fewer bytes
    /// are returned.
    async fn range_read(&self, path: &Path, offset: u64, length: usize) -> anyhow::Result<Vec<u8>>;
}

#[async_trait::async_trait]
pub trait FileWriterInfra: Send + Sync {
    async fn write(&self, path: &Path, contents: Bytes, mode: WriteMode) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait FileInfoInfra: Send + Sync {
    /// `Ok(false)` for a missing path; other failures are errors.
    async fn exists(&self, path: &Path) -> anyhow::Result<bool>;
    async fn meta(&self, path: &Path) -> anyhow::Result<FileMeta>;
    async fn set_modified(&self, path: &Path, mtime: SystemTime) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait FileRemoverInfra: Send + Sync {
    /// Removes a file or a whole directory tree.
    async fn remove(&self, path: &Path) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait FileDirectoryInfra: Send + Sync {
    async fn create_dirs(&self, path: &Path) -> anyhow::Result<()>;

    /// Creates one directory level; the parent must exist.
    async fn create_dir(&self, path: &Path) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait DirectoryReaderInfra: Send + Sync {
    /// Immediate children of `directory` as `(path, is_dir)` pairs.
    async fn list_directory_entries(&self, directory: &Path)
    -> anyhow::Result<Vec<(PathBuf, bool)>>;
}

#[async_trait::async_trait]
pub trait FileTransferInfra: Send + Sync {
    async fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()>;

    /// Atomic rename where possible, copy and delete otherwise.
    async fn rename(&self, from: &Path, to: &Path) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait FileHashInfra: Send + Sync {
    async fn digest(&self, path: &Path, algorithm: HashAlgorithm) -> anyhow::Result<String>;
}

/// Read-only resources shipped with the application.
#[async_trait::async_trait]
pub trait AssetInfra: Send + Sync {
    async fn read_asset(&self, path: &Path) -> anyhow::Result<Vec<u8>>;
    async fn asset_exists(&self, path: &Path) -> anyhow::Result<bool>;
}

/// Performs network transfers on behalf of the download coordinator.
#[async_trait::async_trait]
pub trait DownloadInfra: Send + Sync {
    /// Starts `job` and returns the channel its lifecycle signals arrive on.
    /// Dropping the receiver asks the provider to stop the transfer.
    async fn submit(&self, job: DownloadJob) -> anyhow::Result<mpsc::Receiver<DownloadSignal>>;
}
