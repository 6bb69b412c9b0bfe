use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fsgate_app::{DownloadHandle, EnvironmentInfra, NativeFileService};
use fsgate_domain::{Constants, DirEntry, DownloadJob, FsGateConfig, StatResult};
use fsgate_infra::FsGateInfra;
use fsgate_services::FsGateServices;

/// Entry point for hosts: the facade wired to the native provider.
pub struct FsGateAPI<S, F> {
    services: Arc<S>,
    infra: Arc<F>,
}

impl<S, F> FsGateAPI<S, F> {
    pub fn new(services: Arc<S>, infra: Arc<F>) -> Self {
        Self { services, infra }
    }
}

impl FsGateAPI<FsGateServices<FsGateInfra>, FsGateInfra> {
    pub fn init(config: FsGateConfig) -> Self {
        Self::wire(FsGateInfra::new(config))
    }

    /// Builds the stack from `FSGATE_*` environment variables.
    pub fn from_env() -> Self {
        Self::wire(FsGateInfra::from_env())
    }

    fn wire(infra: FsGateInfra) -> Self {
        let infra = Arc::new(infra);
        let services = Arc::new(FsGateServices::new(infra.clone()));
        Self { services, infra }
    }
}

impl<S, F: EnvironmentInfra> FsGateAPI<S, F> {
    pub fn config(&self) -> FsGateConfig {
        self.infra.get_config()
    }
}

#[async_trait::async_trait]
impl<S: NativeFileService, F: EnvironmentInfra> NativeFileService for FsGateAPI<S, F> {
    fn get_constants(&self) -> Constants {
        self.services.get_constants()
    }

    async fn read_file(&self, path: &Path) -> anyhow::Result<String> {
        self.services.read_file(path).await
    }

    async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.services.exists(path).await
    }

    async fn mkdir(&self, path: &Path) -> anyhow::Result<()> {
        self.services.mkdir(path).await
    }

    async fn write_file(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        self.services.write_file(path, contents).await
    }

    async fn append_file(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        self.services.append_file(path, contents).await
    }

    async fn read_file_assets(&self, path: &Path) -> anyhow::Result<String> {
        self.services.read_file_assets(path).await
    }

    async fn exists_assets(&self, path: &Path) -> anyhow::Result<bool> {
        self.services.exists_assets(path).await
    }

    async fn copy_file(&self, from: &Path, into: &Path) -> anyhow::Result<()> {
        self.services.copy_file(from, into).await
    }

    async fn move_file(&self, from: &Path, into: &Path) -> anyhow::Result<()> {
        self.services.move_file(from, into).await
    }

    async fn unlink(&self, path: &Path) -> anyhow::Result<()> {
        self.services.unlink(path).await
    }

    async fn hash(&self, path: &Path, algorithm: &str) -> anyhow::Result<String> {
        self.services.hash(path, algorithm).await
    }

    async fn read(&self, path: &Path, length: usize, position: u64) -> anyhow::Result<String> {
        self.services.read(path, length, position).await
    }

    async fn write(&self, path: &Path, contents: &str, position: i64) -> anyhow::Result<()> {
        self.services.write(path, contents, position).await
    }

    async fn touch(&self, path: &Path, mtime: Option<DateTime<Utc>>) -> anyhow::Result<bool> {
        self.services.touch(path, mtime).await
    }

    async fn stat(&self, path: &Path) -> anyhow::Result<StatResult> {
        self.services.stat(path).await
    }

    async fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<DirEntry>> {
        self.services.read_dir(path).await
    }

    async fn download_file(&self, job: DownloadJob) -> anyhow::Result<DownloadHandle> {
        self.services.download_file(job).await
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::TimeZone;
    use fsgate_domain::{DownloadEvent, EntryType, Error};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        api: FsGateAPI<FsGateServices<FsGateInfra>, FsGateInfra>,
        sandbox: TempDir,
        _cache: TempDir,
    }

    fn fixture(update: impl FnOnce(FsGateConfig) -> FsGateConfig) -> Fixture {
        let sandbox = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let config = update(FsGateConfig::new(sandbox.path(), cache.path()));
        Fixture { api: FsGateAPI::init(config), sandbox, _cache: cache }
    }

    fn error_of(err: &anyhow::Error) -> &Error {
        err.downcast_ref::<Error>().expect("expected a facade error")
    }

    #[tokio::test]
    async fn test_constants_report_configured_roots() {
        let fixture = fixture(|c| c);

        let actual = fixture.api.get_constants();

        assert_eq!(actual.sandbox_root, fixture.sandbox.path());
        assert_eq!(actual.regular_file, EntryType::RegularFile);
    }

    #[tokio::test]
    async fn test_non_utf8_round_trip_on_disk() {
        let fixture = fixture(|c| c);
        let payload = STANDARD.encode([0xc3u8, 0x28, 0x00, 0xff]);

        fixture.api.write_file(Path::new("raw.bin"), &payload).await.unwrap();
        let actual = fixture.api.read_file(Path::new("raw.bin")).await.unwrap();

        assert_eq!(actual, payload);
        let on_disk = std::fs::read(fixture.sandbox.path().join("raw.bin")).unwrap();
        assert_eq!(on_disk, vec![0xc3, 0x28, 0x00, 0xff]);
    }

    #[tokio::test]
    async fn test_partial_write_at_offset() {
        let fixture = fixture(|c| c);
        let path = fixture.sandbox.path().join("data.txt");
        std::fs::write(&path, "0123456789abcdefghij").unwrap();

        fixture
            .api
            .write(&path, &STANDARD.encode("XYZ"), 10)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0123456789XYZdefghij");
        let window = fixture.api.read(&path, 5, 8).await.unwrap();
        assert_eq!(window, STANDARD.encode("89XYZ"));
    }

    #[tokio::test]
    async fn test_mkdir_is_idempotent_and_stat_reports_directory() {
        let fixture = fixture(|c| c);

        fixture.api.mkdir(Path::new("a/b/c")).await.unwrap();
        fixture.api.mkdir(Path::new("a/b/c")).await.unwrap();
        let actual = fixture.api.stat(Path::new("a/b/c")).await.unwrap();

        assert_eq!(actual.entry_type, EntryType::Directory);
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_found() {
        let fixture = fixture(|c| c);

        let err = fixture.api.stat(Path::new("ghost")).await.unwrap_err();

        assert!(matches!(error_of(&err), Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_dir_lists_only_immediate_children() {
        let fixture = fixture(|c| c);
        let root = fixture.sandbox.path().join("dir");
        std::fs::create_dir_all(root.join("nested")).unwrap();
        std::fs::write(root.join("one.txt"), "1").unwrap();
        std::fs::write(root.join("nested/deep.txt"), "2").unwrap();

        let mut actual: Vec<_> = fixture
            .api
            .read_dir(Path::new("dir"))
            .await
            .unwrap()
            .into_iter()
            .map(|entry| (entry.name, entry.entry_type))
            .collect();
        actual.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(
            actual,
            vec![
                ("nested".to_string(), EntryType::Directory),
                ("one.txt".to_string(), EntryType::RegularFile),
            ]
        );
    }

    #[tokio::test]
    async fn test_hash_algorithms() {
        let fixture = fixture(|c| c);
        std::fs::write(fixture.sandbox.path().join("abc.txt"), "abc").unwrap();
        let path = Path::new("abc.txt");

        assert_eq!(
            fixture.api.hash(path, "md5").await.unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            fixture.api.hash(path, "sha1").await.unwrap(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            fixture.api.hash(path, "sha256").await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_copy_guard_and_move() {
        let fixture = fixture(|c| c);
        fixture.api.mkdir(Path::new("a")).await.unwrap();
        fixture.api.mkdir(Path::new("b")).await.unwrap();
        fixture.api.write_file(Path::new("a/x.txt"), &STANDARD.encode("x")).await.unwrap();

        let err = fixture
            .api
            .copy_file(Path::new("a/x.txt"), Path::new("b/x.txt"))
            .await
            .unwrap_err();
        fixture.api.move_file(Path::new("a/x.txt"), Path::new("b/y.txt")).await.unwrap();

        assert!(matches!(error_of(&err), Error::AlreadyExists(_)));
        assert!(!fixture.api.exists(Path::new("a/x.txt")).await.unwrap());
        assert!(fixture.api.exists(Path::new("b/y.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_materializes_missing_parents() {
        let fixture = fixture(|c| c.create_intermediate_dirs(true));

        fixture
            .api
            .write_file(Path::new("deep/er/file.txt"), &STANDARD.encode("ok"))
            .await
            .unwrap();

        let on_disk = std::fs::read_to_string(fixture.sandbox.path().join("deep/er/file.txt"));
        assert_eq!(on_disk.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_touch_updates_mtime() {
        let fixture = fixture(|c| c);
        std::fs::write(fixture.sandbox.path().join("t.txt"), "t").unwrap();
        let mtime = Utc.timestamp_opt(1_600_000_000, 0).unwrap();

        let touched = fixture.api.touch(Path::new("t.txt"), Some(mtime)).await.unwrap();
        let actual = fixture.api.stat(Path::new("t.txt")).await.unwrap();

        assert!(touched);
        assert_eq!(actual.mtime, mtime);
    }

    #[tokio::test]
    async fn test_unlink_removes_directory_tree() {
        let fixture = fixture(|c| c);
        std::fs::create_dir_all(fixture.sandbox.path().join("tree/leaf")).unwrap();

        fixture.api.unlink(Path::new("tree")).await.unwrap();

        assert!(!fixture.sandbox.path().join("tree").exists());
    }

    #[tokio::test]
    async fn test_download_never_deletes_directories() {
        let fixture = fixture(|c| c);
        let photos = fixture.sandbox.path().join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        std::fs::write(photos.join("keep.jpg"), "jpeg").unwrap();

        let into_dir = fixture
            .api
            .download_file(DownloadJob::new(1, "http://localhost/f", "photos"))
            .await;
        let into_root = fixture
            .api
            .download_file(DownloadJob::new(2, "http://localhost/f", ""))
            .await;

        assert!(matches!(error_of(&into_dir.unwrap_err()), Error::TypeMismatch { .. }));
        assert!(matches!(error_of(&into_root.unwrap_err()), Error::InvalidArgument(_)));
        assert!(photos.join("keep.jpg").exists());
    }

    #[tokio::test]
    async fn test_download_replaces_destination() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/payload")
            .with_body("fresh!!")
            .create_async()
            .await;
        let fixture = fixture(|c| c);
        std::fs::write(fixture.sandbox.path().join("out.bin"), "stale content").unwrap();
        let job = DownloadJob::new(7, format!("{}/payload", server.url()), "out.bin").begin(true);

        let handle = fixture.api.download_file(job).await.unwrap();
        let (events, result) = handle.finish().await;

        let result = result.unwrap();
        assert_eq!((result.status_code, result.bytes_written), (200, 7));
        assert!(matches!(events.first(), Some(DownloadEvent::Begin { job_id: 7, .. })));
        let on_disk = std::fs::read_to_string(fixture.sandbox.path().join("out.bin")).unwrap();
        assert_eq!(on_disk, "fresh!!");
    }
}
