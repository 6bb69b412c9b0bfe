use std::collections::BTreeMap;
use std::path::PathBuf;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::Error;

/// A single transfer request as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(rename_all = "camelCase")]
#[setters(strip_option, into)]
pub struct DownloadJob {
    pub job_id: u64,
    pub from_url: String,
    pub to_file: PathBuf,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Emit a begin event once the response headers arrive.
    #[serde(default, rename = "hasBeginCallback")]
    pub begin: bool,
    /// Emit progress events while the body is written.
    #[serde(default, rename = "hasProgressCallback")]
    pub progress: bool,
    #[serde(default)]
    pub progress_interval: Option<u64>,
    /// Report progress only when another `100 / divider` percent has been
    /// written.
    #[serde(default)]
    pub progress_divider: Option<u32>,
    #[serde(default)]
    pub connection_timeout: Option<u64>,
    #[serde(default)]
    pub read_timeout: Option<u64>,
}

impl DownloadJob {
    pub fn new(job_id: u64, from_url: impl Into<String>, to_file: impl Into<PathBuf>) -> Self {
        Self {
            job_id,
            from_url: from_url.into(),
            to_file: to_file.into(),
            headers: BTreeMap::new(),
            begin: false,
            progress: false,
            progress_interval: None,
            progress_divider: None,
            connection_timeout: None,
            read_timeout: None,
        }
    }
}

/// Lifecycle of a job while the coordinator owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DownloadState {
    Pending,
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl DownloadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Moves to `next`, refusing transitions out of a terminal state.
    pub fn advance(self, job_id: u64, next: DownloadState) -> Result<Self, Error> {
        use DownloadState::*;
        match (self, next) {
            (Pending, Active) | (Pending, Failed) | (Pending, Cancelled) => Ok(next),
            (Active, Completed) | (Active, Failed) | (Active, Cancelled) => Ok(next),
            (current, _) if current.is_terminal() => Err(Error::AlreadySettled(job_id)),
            (current, next) => Err(Error::InvalidArgument(format!(
                "Illegal download transition {current} -> {next}"
            ))),
        }
    }
}

/// Raw lifecycle signals raised by the download provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSignal {
    Begin {
        status_code: u16,
        content_length: u64,
        headers: BTreeMap<String, String>,
    },
    Progress {
        content_length: u64,
        bytes_written: u64,
    },
    Complete {
        status_code: u16,
        bytes_written: u64,
    },
    Pause,
    Remove,
    Fail {
        message: String,
    },
}

/// Out-of-band events delivered to the caller, keyed by job id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum DownloadEvent {
    #[serde(rename = "DownloadBegin")]
    Begin {
        job_id: u64,
        status_code: u16,
        content_length: u64,
        headers: BTreeMap<String, String>,
    },
    #[serde(rename = "DownloadProgress")]
    Progress {
        job_id: u64,
        content_length: u64,
        bytes_written: u64,
    },
}

impl DownloadEvent {
    pub fn job_id(&self) -> u64 {
        match self {
            Self::Begin { job_id, .. } | Self::Progress { job_id, .. } => *job_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    pub job_id: u64,
    pub status_code: u16,
    pub bytes_written: u64,
}
