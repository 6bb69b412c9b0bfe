use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag distinguishing regular files from directories. Crosses the facade
/// boundary as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EntryType {
    RegularFile = 0,
    Directory = 1,
}

impl EntryType {
    pub fn from_is_dir(is_dir: bool) -> Self {
        if is_dir { Self::Directory } else { Self::RegularFile }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl From<EntryType> for u8 {
    fn from(value: EntryType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for EntryType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::RegularFile),
            1 => Ok(Self::Directory),
            other => Err(format!("unknown entry type tag {other}")),
        }
    }
}

/// Where a write lands. Every write picks exactly one; all of them create the
/// file when it is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and write from the start.
    Overwrite,
    Append,
    /// Write at a byte offset, leaving the rest of the file intact.
    At(u64),
}

/// Metadata exactly as the provider reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub len: u64,
    pub mode: u32,
    pub is_dir: bool,
    /// Path the provider resolved while reading metadata, when it differs
    /// from the requested one.
    pub canonical: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatResult {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ctime: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub mtime: DateTime<Utc>,
    pub size: u64,
    pub mode: u32,
    pub original_filepath: PathBuf,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

impl StatResult {
    /// Normalizes provider metadata for `path`. Platforms without a birth
    /// time report the modification time as `ctime`.
    pub fn from_meta(path: impl Into<PathBuf>, meta: FileMeta) -> Self {
        let mtime = meta.modified.map(DateTime::<Utc>::from).unwrap_or_default();
        let ctime = meta.created.map(DateTime::<Utc>::from).unwrap_or(mtime);
        Self {
            ctime,
            mtime,
            size: meta.len,
            mode: meta.mode,
            original_filepath: meta.canonical.unwrap_or_else(|| path.into()),
            entry_type: EntryType::from_is_dir(meta.is_dir),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub ctime: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub mtime: Option<DateTime<Utc>>,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, stat: &StatResult) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: stat.size,
            entry_type: stat.entry_type,
            ctime: Some(stat.ctime),
            mtime: Some(stat.mtime),
        }
    }
}
