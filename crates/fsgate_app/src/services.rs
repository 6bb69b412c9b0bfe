use std::path::Path;

use chrono::{DateTime, Utc};
use fsgate_domain::{Constants, DirEntry, DownloadJob, StatResult};

use crate::DownloadHandle;

/// The file-access facade as seen by a managed caller.
///
/// Paths are plain paths, relative ones resolving against the sandbox root.
/// File content always crosses this boundary as a base64 string.
#[async_trait::async_trait]
pub trait NativeFileService: Send + Sync {
    fn get_constants(&self) -> Constants;

    async fn read_file(&self, path: &Path) -> anyhow::Result<String>;

    async fn exists(&self, path: &Path) -> anyhow::Result<bool>;

    /// Recursive; an already existing directory is not an error.
    async fn mkdir(&self, path: &Path) -> anyhow::Result<()>;

    async fn write_file(&self, path: &Path, contents: &str) -> anyhow::Result<()>;

    async fn append_file(&self, path: &Path, contents: &str) -> anyhow::Result<()>;

    async fn read_file_assets(&self, path: &Path) -> anyhow::Result<String>;

    async fn exists_assets(&self, path: &Path) -> anyhow::Result<bool>;

    async fn copy_file(&self, from: &Path, into: &Path) -> anyhow::Result<()>;

    async fn move_file(&self, from: &Path, into: &Path) -> anyhow::Result<()>;

    async fn unlink(&self, path: &Path) -> anyhow::Result<()>;

    /// Lowercase hex digest; `algorithm` is one of `md5`, `sha1`, `sha256`.
    async fn hash(&self, path: &Path, algorithm: &str) -> anyhow::Result<String>;

    async fn read(&self, path: &Path, length: usize, position: u64) -> anyhow::Result<String>;

    /// Writes at `position`; a negative position appends.
    async fn write(&self, path: &Path, contents: &str, position: i64) -> anyhow::Result<()>;

    /// Returns `false` without touching the file when `mtime` is `None`.
    async fn touch(&self, path: &Path, mtime: Option<DateTime<Utc>>) -> anyhow::Result<bool>;

    async fn stat(&self, path: &Path) -> anyhow::Result<StatResult>;

    async fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<DirEntry>>;

    async fn download_file(&self, job: DownloadJob) -> anyhow::Result<DownloadHandle>;
}
