use std::path::Path;
use std::sync::Arc;

use fsgate_app::path::as_directory;
use fsgate_app::{
    AssetInfra, DirectoryReaderInfra, EnvironmentInfra, FileDirectoryInfra, FileInfoInfra,
    FileReaderInfra, FileRemoverInfra, FileTransferInfra, FileWriterInfra,
};
use fsgate_domain::DirEntry;
use tracing::debug;

use crate::FsGateFileOps;
use crate::error::not_found_for;

/// Lists the immediate children of a directory and fills in each child's
/// metadata with a follow-up stat.
pub struct FsGateDirLister<F> {
    infra: Arc<F>,
    file_ops: Arc<FsGateFileOps<F>>,
}

impl<F> FsGateDirLister<F>
where
    F: EnvironmentInfra
        + DirectoryReaderInfra
        + FileReaderInfra
        + FileWriterInfra
        + FileInfoInfra
        + FileRemoverInfra
        + FileDirectoryInfra
        + FileTransferInfra
        + AssetInfra,
{
    pub fn new(infra: Arc<F>, file_ops: Arc<FsGateFileOps<F>>) -> Self {
        Self { infra, file_ops }
    }

    /// One stat per child, in provider order. The first child that cannot be
    /// stat'ed fails the whole listing.
    pub async fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<DirEntry>> {
        let directory = as_directory(&self.file_ops.resolve(path));
        let children = self
            .infra
            .list_directory_entries(&directory)
            .await
            .map_err(not_found_for(&directory))?;
        debug!(path = %directory.display(), count = children.len(), "Listed directory");

        let mut entries = Vec::with_capacity(children.len());
        for (child, _) in children {
            let stat = self.file_ops.stat(&child).await?;
            let name = child
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(DirEntry::new(name, child, &stat));
        }

        Ok(entries)
    }
}
