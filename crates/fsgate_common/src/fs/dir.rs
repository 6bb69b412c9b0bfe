use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

impl crate::fs::FsGateFS {
    pub async fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory {}", path.display()))
    }

    /// Creates exactly one directory level. Fails with `AlreadyExists` when
    /// the directory is already there.
    pub async fn create_dir(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::create_dir(path)
            .await
            .with_context(|| format!("Failed to create directory {}", path.display()))
    }

    /// Lists the immediate children of `path` with a directory flag each.
    pub async fn list_dir(path: impl AsRef<Path>) -> Result<Vec<(PathBuf, bool)>> {
        let path = path.as_ref();
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("Failed to read directory {}", path.display()))?;

        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to read directory entry in {}", path.display()))?
        {
            let is_dir = entry
                .file_type()
                .await
                .with_context(|| format!("Failed to read file type of {}", entry.path().display()))?
                .is_dir();
            children.push((entry.path(), is_dir));
        }

        Ok(children)
    }

    /// Removes a file, or a directory together with its contents.
    pub async fn remove(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let metadata = tokio::fs::symlink_metadata(path)
            .await
            .with_context(|| format!("Failed to remove {}", path.display()))?;

        let removed = if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };
        removed.with_context(|| format!("Failed to remove {}", path.display()))
    }
}
