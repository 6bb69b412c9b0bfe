use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::EntryType;

/// Read-only values exposed to the caller at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    #[serde(rename = "FileSandBoxPath")]
    pub sandbox_root: PathBuf,
    #[serde(rename = "FileCachePath")]
    pub cache_root: PathBuf,
    #[serde(rename = "RegularFile")]
    pub regular_file: EntryType,
    #[serde(rename = "Directory")]
    pub directory: EntryType,
}

impl Constants {
    pub fn new(sandbox_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox_root: sandbox_root.into(),
            cache_root: cache_root.into(),
            regular_file: EntryType::RegularFile,
            directory: EntryType::Directory,
        }
    }
}
