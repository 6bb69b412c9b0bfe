use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use fsgate_app::path::{is_contained, same_file_name};
use fsgate_app::{
    AssetInfra, EnvironmentInfra, FileDirectoryInfra, FileInfoInfra, FileReaderInfra,
    FileRemoverInfra, FileTransferInfra, FileWriterInfra,
};
use fsgate_domain::{Error, StatResult, WriteMode, is_io_kind};
use tracing::debug;

use crate::FsGatePathResolver;
use crate::error::not_found_for;

/// Byte-level file operations behind the facade. Every method resolves the
/// caller path first and turns provider "not found" failures into
/// `Error::NotFound` where the operation needs the path to exist.
pub struct FsGateFileOps<F> {
    infra: Arc<F>,
    paths: FsGatePathResolver<F>,
}

impl<F> FsGateFileOps<F>
where
    F: EnvironmentInfra
        + FileReaderInfra
        + FileWriterInfra
        + FileInfoInfra
        + FileRemoverInfra
        + FileDirectoryInfra
        + FileTransferInfra
        + AssetInfra,
{
    pub fn new(infra: Arc<F>) -> Self {
        Self { paths: FsGatePathResolver::new(infra.clone()), infra }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.paths.resolve(path)
    }

    pub async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        let path = self.resolve(path);
        debug!(path = %path.display(), "Reading file");
        self.infra.read(&path).await.map_err(not_found_for(&path))
    }

    pub async fn read_range(
        &self,
        path: &Path,
        length: usize,
        position: u64,
    ) -> anyhow::Result<Vec<u8>> {
        let path = self.resolve(path);
        debug!(path = %path.display(), length, position, "Reading file range");
        self.infra
            .range_read(&path, position, length)
            .await
            .map_err(not_found_for(&path))
    }

    pub async fn write(&self, path: &Path, contents: Bytes, mode: WriteMode) -> anyhow::Result<()> {
        let path = self.resolve(path);
        if self.infra.get_config().create_intermediate_dirs {
            self.paths.materialize_parents(&path).await?;
        }

        debug!(path = %path.display(), bytes = contents.len(), ?mode, "Writing file");
        self.infra.write(&path, contents, mode).await
    }

    pub async fn copy(&self, from: &Path, into: &Path) -> anyhow::Result<()> {
        let (from, into) = (self.resolve(from), self.resolve(into));
        if self.infra.get_config().copy_name_guard && same_file_name(&from, &into) {
            return Err(Error::AlreadyExists(into).into());
        }

        debug!(from = %from.display(), into = %into.display(), "Copying file");
        self.infra.copy(&from, &into).await.map_err(not_found_for(&from))
    }

    pub async fn rename(&self, from: &Path, into: &Path) -> anyhow::Result<()> {
        let (from, into) = (self.resolve(from), self.resolve(into));
        debug!(from = %from.display(), into = %into.display(), "Moving file");
        self.infra.rename(&from, &into).await.map_err(not_found_for(&from))
    }

    pub async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        let path = self.resolve(path);
        debug!(path = %path.display(), "Removing path");
        self.infra.remove(&path).await.map_err(not_found_for(&path))
    }

    /// Sets the modification time of an existing regular file. Returns
    /// `false` without side effects when no time was requested.
    pub async fn touch(&self, path: &Path, mtime: Option<DateTime<Utc>>) -> anyhow::Result<bool> {
        let stat = self.stat(path).await?;
        if stat.is_dir() {
            return Err(Error::expected_file(self.resolve(path)).into());
        }

        let Some(mtime) = mtime else {
            return Ok(false);
        };

        let path = self.resolve(path);
        debug!(path = %path.display(), %mtime, "Touching file");
        self.infra.set_modified(&path, SystemTime::from(mtime)).await?;
        Ok(true)
    }

    pub async fn stat(&self, path: &Path) -> anyhow::Result<StatResult> {
        let path = self.resolve(path);
        let meta = self.infra.meta(&path).await.map_err(not_found_for(&path))?;
        Ok(StatResult::from_meta(path, meta))
    }

    pub async fn exists(&self, path: &Path) -> anyhow::Result<bool> {
        self.infra.exists(&self.resolve(path)).await
    }

    /// Recursive directory creation; an existing directory counts as success.
    pub async fn mkdir(&self, path: &Path) -> anyhow::Result<()> {
        let path = self.resolve(path);
        match self.infra.create_dirs(&path).await {
            Ok(()) => Ok(()),
            Err(err) if is_io_kind(&err, ErrorKind::AlreadyExists) => {
                debug!(path = %path.display(), "Directory already exists");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub async fn read_asset(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        ensure_asset_path(path)?;
        debug!(path = %path.display(), "Reading bundled asset");
        self.infra.read_asset(path).await.map_err(not_found_for(path))
    }

    pub async fn asset_exists(&self, path: &Path) -> anyhow::Result<bool> {
        ensure_asset_path(path)?;
        self.infra.asset_exists(path).await
    }
}

fn ensure_asset_path(path: &Path) -> Result<(), Error> {
    if is_contained(path) && path.file_name().is_some() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "Asset path must be relative to the asset root: {}",
            path.display()
        )))
    }
}
