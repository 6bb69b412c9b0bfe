use std::path::PathBuf;
use std::time::Duration;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::Constants;

/// Configuration handed to the facade at construction. Nothing in the facade
/// reads path roots from process-global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct FsGateConfig {
    /// Private application storage. Relative caller paths resolve here.
    pub sandbox_root: PathBuf,
    pub cache_root: PathBuf,
    /// Read-only root of the bundled asset provider.
    pub assets_root: PathBuf,
    /// Create missing parent directories one segment at a time before writes.
    pub create_intermediate_dirs: bool,
    /// Reject copies whose source and destination share a file name. Hosts
    /// built against the earlier facade expect this rejection, so it is on
    /// unless turned off.
    pub copy_name_guard: bool,
    pub download: DownloadConfig,
}

impl FsGateConfig {
    pub fn new(sandbox_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        let sandbox_root = sandbox_root.into();
        Self {
            assets_root: sandbox_root.join("assets"),
            sandbox_root,
            cache_root: cache_root.into(),
            create_intermediate_dirs: false,
            copy_name_guard: true,
            download: DownloadConfig::default(),
        }
    }

    pub fn constants(&self) -> Constants {
        Constants::new(&self.sandbox_root, &self.cache_root)
    }
}

/// Defaults applied to download jobs that do not carry their own values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
pub struct DownloadConfig {
    pub connection_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Minimum gap between progress signals. Zero reports every chunk.
    pub progress_interval_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            connection_timeout_ms: 15_000,
            read_timeout_ms: 15_000,
            progress_interval_ms: 0,
        }
    }
}

impl DownloadConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
