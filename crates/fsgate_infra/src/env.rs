use std::path::PathBuf;
use std::str::FromStr;

use fsgate_app::EnvironmentInfra;
use fsgate_domain::{DownloadConfig, FsGateConfig};
use tracing::{debug, warn};

const APP_DIR: &str = "fsgate";

/// Supplies the facade configuration. Built either from an explicit
/// `FsGateConfig` or from `FSGATE_*` environment variables.
pub struct FsGateEnvironmentInfra {
    config: FsGateConfig,
}

impl FsGateEnvironmentInfra {
    pub fn new(config: FsGateConfig) -> Self {
        Self { config }
    }

    /// Loads `.env` if present, then reads the configuration from the
    /// process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded environment file");
        }
        Self::new(read_config(|key| std::env::var(key).ok()))
    }
}

impl EnvironmentInfra for FsGateEnvironmentInfra {
    fn get_config(&self) -> FsGateConfig {
        self.config.clone()
    }
}

fn default_root(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(std::env::temp_dir).join(APP_DIR)
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}

pub(crate) fn read_config(lookup: impl Fn(&str) -> Option<String>) -> FsGateConfig {
    let sandbox_root = lookup("FSGATE_SANDBOX_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_root(dirs::data_dir()));
    let cache_root = lookup("FSGATE_CACHE_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_root(dirs::cache_dir()));

    let mut config = FsGateConfig::new(sandbox_root, cache_root);
    if let Some(assets_root) = lookup("FSGATE_ASSETS_ROOT") {
        config = config.assets_root(assets_root);
    }
    if let Some(flag) = parse::<bool>(&lookup, "FSGATE_CREATE_INTERMEDIATE_DIRS") {
        config = config.create_intermediate_dirs(flag);
    }
    if let Some(flag) = parse::<bool>(&lookup, "FSGATE_COPY_NAME_GUARD") {
        config = config.copy_name_guard(flag);
    }

    let defaults = DownloadConfig::default();
    config.download(DownloadConfig {
        connection_timeout_ms: parse(&lookup, "FSGATE_CONNECTION_TIMEOUT_MS")
            .unwrap_or(defaults.connection_timeout_ms),
        read_timeout_ms: parse(&lookup, "FSGATE_READ_TIMEOUT_MS").unwrap_or(defaults.read_timeout_ms),
        progress_interval_ms: parse(&lookup, "FSGATE_PROGRESS_INTERVAL_MS")
            .unwrap_or(defaults.progress_interval_ms),
    })
}
