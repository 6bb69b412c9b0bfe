use std::path::Path;

use fsgate_app::FileHashInfra;
use fsgate_common::fs::FsGateFS;
use fsgate_domain::HashAlgorithm;

pub struct FsGateFileHashService;

#[async_trait::async_trait]
impl FileHashInfra for FsGateFileHashService {
    async fn digest(&self, path: &Path, algorithm: HashAlgorithm) -> anyhow::Result<String> {
        FsGateFS::digest(path, algorithm).await
    }
}
