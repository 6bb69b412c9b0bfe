use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fsgate_app::path::{parent_chain, resolve};
use fsgate_app::{EnvironmentInfra, FileDirectoryInfra, FileInfoInfra};
use fsgate_domain::{Error, is_io_kind};
use tracing::debug;

/// Turns caller paths into provider paths rooted at the sandbox.
pub struct FsGatePathResolver<F> {
    infra: Arc<F>,
}

impl<F> Clone for FsGatePathResolver<F> {
    fn clone(&self) -> Self {
        Self { infra: self.infra.clone() }
    }
}

impl<F: EnvironmentInfra + FileInfoInfra + FileDirectoryInfra> FsGatePathResolver<F> {
    pub fn new(infra: Arc<F>) -> Self {
        Self { infra }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve(&self.infra.get_config().sandbox_root, path)
    }

    /// Creates the missing parent directories of `target` one segment at a
    /// time. Segments that already exist are skipped, so repeated calls are
    /// harmless. The first segment that cannot be created is reported.
    pub async fn materialize_parents(&self, target: &Path) -> anyhow::Result<()> {
        let base = self.infra.get_config().sandbox_root;
        for segment in parent_chain(&base, target) {
            if self.infra.exists(&segment).await.map_err(creation_failed(&segment))? {
                continue;
            }

            debug!(segment = %segment.display(), "Creating directory segment");
            match self.infra.create_dir(&segment).await {
                Ok(()) => {}
                Err(err) if is_io_kind(&err, ErrorKind::AlreadyExists) => {}
                Err(err) => return Err(creation_failed(&segment)(err)),
            }
        }
        Ok(())
    }
}

fn creation_failed(segment: &Path) -> impl FnOnce(anyhow::Error) -> anyhow::Error + '_ {
    move |err| {
        Error::DirectoryCreation { segment: segment.to_path_buf(), reason: format!("{err:#}") }
            .into()
    }
}
