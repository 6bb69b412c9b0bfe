use std::path::Path;
use std::sync::Arc;

use fsgate_app::{EnvironmentInfra, FileDirectoryInfra, FileHashInfra, FileInfoInfra};
use fsgate_domain::{Error, HashAlgorithm};
use tracing::debug;

use crate::FsGatePathResolver;
use crate::error::not_found_for;

pub struct FsGateHasher<F> {
    infra: Arc<F>,
    paths: FsGatePathResolver<F>,
}

impl<F: EnvironmentInfra + FileInfoInfra + FileDirectoryInfra + FileHashInfra> FsGateHasher<F> {
    pub fn new(infra: Arc<F>) -> Self {
        Self { paths: FsGatePathResolver::new(infra.clone()), infra }
    }

    /// Digest of the file at `path` as lowercase hex.
    ///
    /// The algorithm name, the existence of the target and its kind are
    /// checked in that order before the provider reads any content.
    pub async fn hash(&self, path: &Path, algorithm: &str) -> anyhow::Result<String> {
        let algorithm = HashAlgorithm::parse(algorithm)?;

        let path = self.paths.resolve(path);
        if !self.infra.exists(&path).await? {
            return Err(Error::NotFound(path).into());
        }
        if self.infra.meta(&path).await.map_err(not_found_for(&path))?.is_dir {
            return Err(Error::expected_file(path).into());
        }

        debug!(path = %path.display(), %algorithm, "Hashing file");
        let digest = self.infra.digest(&path, algorithm).await?;
        Ok(digest.to_lowercase())
    }
}
