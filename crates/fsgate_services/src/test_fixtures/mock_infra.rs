//! Mock infrastructure for facade service tests.
//!
//! An in-memory filesystem and a scripted download provider implementing the
//! provider traits, so service behaviour can be checked without touching the
//! disk or the network.

use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use bytes::Bytes;
use fsgate_app::{
    AssetInfra, DirectoryReaderInfra, DownloadInfra, EnvironmentInfra, FileDirectoryInfra,
    FileHashInfra, FileInfoInfra, FileReaderInfra, FileRemoverInfra, FileTransferInfra,
    FileWriterInfra,
};
use fsgate_domain::{
    DownloadJob, DownloadSignal, FileMeta, FsGateConfig, HashAlgorithm, WriteMode,
};
use sha2::{Digest, Sha256};
use tokio::sync::mpsc;

pub const SANDBOX: &str = "/sandbox";

fn io_error(kind: ErrorKind, op: &str, path: &Path) -> anyhow::Error {
    anyhow::Error::new(std::io::Error::from(kind))
        .context(format!("Failed to {op} {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir,
}

impl MockEntry {
    fn file(content: impl Into<Vec<u8>>) -> Self {
        Self::File { content: content.into(), modified: SystemTime::UNIX_EPOCH }
    }
}

#[derive(Debug)]
pub struct MockFileService {
    pub entries: Mutex<BTreeMap<PathBuf, MockEntry>>,
    pub assets: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    /// Paths on which every provider call fails with `PermissionDenied`.
    pub denied: Mutex<HashSet<PathBuf>>,
    /// Record of `create_dir` calls, in order.
    pub created: Mutex<Vec<PathBuf>>,
}

impl Default for MockFileService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileService {
    pub fn new() -> Self {
        let entries = BTreeMap::from([
            (PathBuf::from("/"), MockEntry::Dir),
            (PathBuf::from(SANDBOX), MockEntry::Dir),
        ]);
        Self {
            entries: Mutex::new(entries),
            assets: Mutex::new(BTreeMap::new()),
            denied: Mutex::new(HashSet::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Adds a file, creating its ancestors.
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.entries.lock().unwrap().insert(path, MockEntry::file(content));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if !ancestor.as_os_str().is_empty() {
                entries.entry(ancestor.to_path_buf()).or_insert(MockEntry::Dir);
            }
        }
    }

    pub fn add_asset(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.assets.lock().unwrap().insert(path.into(), content.into());
    }

    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.denied.lock().unwrap().insert(path.into());
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.entries.lock().unwrap().get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.lock().unwrap().contains_key(path.as_ref())
    }

    fn check(&self, op: &str, path: &Path) -> anyhow::Result<()> {
        if self.denied.lock().unwrap().contains(path) {
            return Err(io_error(ErrorKind::PermissionDenied, op, path));
        }
        Ok(())
    }

    fn file_content(&self, op: &str, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.check(op, path)?;
        match self.entries.lock().unwrap().get(path) {
            Some(MockEntry::File { content, .. }) => Ok(content.clone()),
            Some(MockEntry::Dir) => Err(io_error(ErrorKind::IsADirectory, op, path)),
            None => Err(io_error(ErrorKind::NotFound, op, path)),
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        path.parent()
            .map(|parent| matches!(self.entries.lock().unwrap().get(parent), Some(MockEntry::Dir)))
            .unwrap_or(true)
    }
}

#[async_trait::async_trait]
impl FileReaderInfra for MockFileService {
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.file_content("read", path)
    }

    async fn range_read(&self, path: &Path, offset: u64, length: usize) -> anyhow::Result<Vec<u8>> {
        let content = self.file_content("read", path)?;
        let start = (offset as usize).min(content.len());
        let end = start.saturating_add(length).min(content.len());
        Ok(content[start..end].to_vec())
    }
}

#[async_trait::async_trait]
impl FileWriterInfra for MockFileService {
    async fn write(&self, path: &Path, contents: Bytes, mode: WriteMode) -> anyhow::Result<()> {
        self.check("write", path)?;
        if !self.parent_exists(path) {
            return Err(io_error(ErrorKind::NotFound, "open", path));
        }

        let mut entries = self.entries.lock().unwrap();
        let mut content = match entries.get(path) {
            Some(MockEntry::File { content, .. }) => content.clone(),
            Some(MockEntry::Dir) => return Err(io_error(ErrorKind::IsADirectory, "open", path)),
            None => Vec::new(),
        };

        match mode {
            WriteMode::Overwrite => content = contents.to_vec(),
            WriteMode::Append => content.extend_from_slice(&contents),
            WriteMode::At(offset) => {
                let offset = offset as usize;
                let end = offset + contents.len();
                if content.len() < end {
                    content.resize(end, 0);
                }
                content[offset..end].copy_from_slice(&contents);
            }
        }

        entries.insert(path.to_path_buf(), MockEntry::File { content, modified: SystemTime::now() });
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileInfoInfra for MockFileService {
    async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.check("check existence of", path)?;
        Ok(self.contains(path))
    }

    async fn meta(&self, path: &Path) -> anyhow::Result<FileMeta> {
        self.check("read metadata of", path)?;
        match self.entries.lock().unwrap().get(path) {
            Some(MockEntry::File { content, modified }) => Ok(FileMeta {
                created: None,
                modified: Some(*modified),
                len: content.len() as u64,
                mode: 0o644,
                is_dir: false,
                canonical: None,
            }),
            Some(MockEntry::Dir) => Ok(FileMeta {
                created: None,
                modified: Some(SystemTime::UNIX_EPOCH),
                len: 0,
                mode: 0o755,
                is_dir: true,
                canonical: None,
            }),
            None => Err(io_error(ErrorKind::NotFound, "read metadata of", path)),
        }
    }

    async fn set_modified(&self, path: &Path, mtime: SystemTime) -> anyhow::Result<()> {
        self.check("set modification time of", path)?;
        match self.entries.lock().unwrap().get_mut(path) {
            Some(MockEntry::File { modified, .. }) => {
                *modified = mtime;
                Ok(())
            }
            Some(MockEntry::Dir) => Err(io_error(ErrorKind::IsADirectory, "open", path)),
            None => Err(io_error(ErrorKind::NotFound, "open", path)),
        }
    }
}

#[async_trait::async_trait]
impl FileRemoverInfra for MockFileService {
    async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        self.check("remove", path)?;
        let mut entries = self.entries.lock().unwrap();
        if !entries.contains_key(path) {
            return Err(io_error(ErrorKind::NotFound, "remove", path));
        }
        entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileDirectoryInfra for MockFileService {
    async fn create_dirs(&self, path: &Path) -> anyhow::Result<()> {
        self.check("create directory", path)?;
        if let Some(MockEntry::File { .. }) = self.entries.lock().unwrap().get(path) {
            return Err(io_error(ErrorKind::AlreadyExists, "create directory", path));
        }
        self.add_dir(path);
        Ok(())
    }

    async fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        self.check("create directory", path)?;
        if self.contains(path) {
            return Err(io_error(ErrorKind::AlreadyExists, "create directory", path));
        }
        if !self.parent_exists(path) {
            return Err(io_error(ErrorKind::NotFound, "create directory", path));
        }
        self.created.lock().unwrap().push(path.to_path_buf());
        self.entries.lock().unwrap().insert(path.to_path_buf(), MockEntry::Dir);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DirectoryReaderInfra for MockFileService {
    async fn list_directory_entries(
        &self,
        directory: &Path,
    ) -> anyhow::Result<Vec<(PathBuf, bool)>> {
        self.check("read directory", directory)?;
        let entries = self.entries.lock().unwrap();
        match entries.get(directory) {
            Some(MockEntry::Dir) => {}
            Some(MockEntry::File { .. }) => {
                return Err(io_error(ErrorKind::NotADirectory, "read directory", directory));
            }
            None => return Err(io_error(ErrorKind::NotFound, "read directory", directory)),
        }

        Ok(entries
            .iter()
            .filter(|(path, _)| path.parent() == Some(directory) && path.as_path() != directory)
            .map(|(path, entry)| (path.clone(), matches!(entry, MockEntry::Dir)))
            .collect())
    }
}

#[async_trait::async_trait]
impl FileTransferInfra for MockFileService {
    async fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        let content = self.file_content("copy", from)?;
        self.write(to, Bytes::from(content), WriteMode::Overwrite).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        self.copy(from, to).await?;
        self.remove(from).await
    }
}

#[async_trait::async_trait]
impl FileHashInfra for MockFileService {
    async fn digest(&self, path: &Path, algorithm: HashAlgorithm) -> anyhow::Result<String> {
        let content = self.file_content("read", path)?;
        match algorithm {
            // Uppercase on purpose: the facade must normalize the case.
            HashAlgorithm::Sha256 => Ok(hex::encode_upper(Sha256::digest(&content))),
            other => Err(anyhow::anyhow!("mock digest does not implement {other}")),
        }
    }
}

#[async_trait::async_trait]
impl AssetInfra for MockFileService {
    async fn read_asset(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.assets
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io_error(ErrorKind::NotFound, "read asset", path))
    }

    async fn asset_exists(&self, path: &Path) -> anyhow::Result<bool> {
        Ok(self.assets.lock().unwrap().contains_key(path))
    }
}

/// Download provider replaying a fixed list of signals per submission.
#[derive(Debug, Default)]
pub struct MockDownloadService {
    pub submitted: Mutex<Vec<DownloadJob>>,
    pub script: Mutex<Vec<DownloadSignal>>,
    pub reject: Mutex<Option<String>>,
    /// Sending half of the last submission, for signals pushed by the test.
    pub live: Mutex<Option<mpsc::Sender<DownloadSignal>>>,
}

impl MockDownloadService {
    pub fn script(&self, signals: Vec<DownloadSignal>) {
        *self.script.lock().unwrap() = signals;
    }

    pub fn take_sender(&self) -> mpsc::Sender<DownloadSignal> {
        self.live.lock().unwrap().take().expect("no download was submitted")
    }
}

#[async_trait::async_trait]
impl DownloadInfra for MockDownloadService {
    async fn submit(&self, job: DownloadJob) -> anyhow::Result<mpsc::Receiver<DownloadSignal>> {
        if let Some(message) = self.reject.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        self.submitted.lock().unwrap().push(job);

        let (tx, rx) = mpsc::channel(64);
        for signal in self.script.lock().unwrap().drain(..) {
            tx.try_send(signal)?;
        }
        *self.live.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}

/// Composite mock handed to the services under test.
#[derive(Debug)]
pub struct MockCompositeService {
    pub config: Mutex<FsGateConfig>,
    pub file_service: MockFileService,
    pub download_service: MockDownloadService,
}

impl Default for MockCompositeService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompositeService {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(FsGateConfig::new(SANDBOX, "/cache").assets_root("/assets")),
            file_service: MockFileService::new(),
            download_service: MockDownloadService::default(),
        }
    }

    pub fn with_config(self, update: impl FnOnce(FsGateConfig) -> FsGateConfig) -> Self {
        let config = self.config.lock().unwrap().clone();
        *self.config.lock().unwrap() = update(config);
        self
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.file_service.add_file(path, content);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.file_service.add_dir(path);
    }
}

impl EnvironmentInfra for MockCompositeService {
    fn get_config(&self) -> FsGateConfig {
        self.config.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl FileReaderInfra for MockCompositeService {
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.file_service.read(path).await
    }

    async fn range_read(&self, path: &Path, offset: u64, length: usize) -> anyhow::Result<Vec<u8>> {
        self.file_service.range_read(path, offset, length).await
    }
}

#[async_trait::async_trait]
impl FileWriterInfra for MockCompositeService {
    async fn write(&self, path: &Path, contents: Bytes, mode: WriteMode) -> anyhow::Result<()> {
        self.file_service.write(path, contents, mode).await
    }
}

#[async_trait::async_trait]
impl FileInfoInfra for MockCompositeService {
    async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.file_service.exists(path).await
    }

    async fn meta(&self, path: &Path) -> anyhow::Result<FileMeta> {
        self.file_service.meta(path).await
    }

    async fn set_modified(&self, path: &Path, mtime: SystemTime) -> anyhow::Result<()> {
        self.file_service.set_modified(path, mtime).await
    }
}

#[async_trait::async_trait]
impl FileRemoverInfra for MockCompositeService {
    async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        self.file_service.remove(path).await
    }
}

#[async_trait::async_trait]
impl FileDirectoryInfra for MockCompositeService {
    async fn create_dirs(&self, path: &Path) -> anyhow::Result<()> {
        self.file_service.create_dirs(path).await
    }

    async fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        self.file_service.create_dir(path).await
    }
}

#[async_trait::async_trait]
impl DirectoryReaderInfra for MockCompositeService {
    async fn list_directory_entries(
        &self,
        directory: &Path,
    ) -> anyhow::Result<Vec<(PathBuf, bool)>> {
        self.file_service.list_directory_entries(directory).await
    }
}

#[async_trait::async_trait]
impl FileTransferInfra for MockCompositeService {
    async fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        self.file_service.copy(from, to).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        self.file_service.rename(from, to).await
    }
}

#[async_trait::async_trait]
impl FileHashInfra for MockCompositeService {
    async fn digest(&self, path: &Path, algorithm: HashAlgorithm) -> anyhow::Result<String> {
        self.file_service.digest(path, algorithm).await
    }
}

#[async_trait::async_trait]
impl AssetInfra for MockCompositeService {
    async fn read_asset(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.file_service.read_asset(path).await
    }

    async fn asset_exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.file_service.asset_exists(path).await
    }
}

#[async_trait::async_trait]
impl DownloadInfra for MockCompositeService {
    async fn submit(&self, job: DownloadJob) -> anyhow::Result<mpsc::Receiver<DownloadSignal>> {
        self.download_service.submit(job).await
    }
}
