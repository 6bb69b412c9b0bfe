use std::path::{Path, PathBuf};

use fsgate_app::AssetInfra;
use fsgate_common::fs::FsGateFS;

/// Read-only asset provider backed by a directory on disk.
pub struct FsGateAssetService {
    root: PathBuf,
}

impl FsGateAssetService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl AssetInfra for FsGateAssetService {
    async fn read_asset(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        FsGateFS::read(self.root.join(path)).await
    }

    async fn asset_exists(&self, path: &Path) -> anyhow::Result<bool> {
        let path = self.root.join(path);
        Ok(FsGateFS::exists(&path).await? && !FsGateFS::is_dir(&path).await?)
    }
}
