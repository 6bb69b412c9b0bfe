use std::path::Path;

use anyhow::Context;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_PREFIX: &str = "fsgate";

/// Workspace crates whose events reach the log file.
const LOG_TARGETS: [&str; 6] = [
    "fsgate_common",
    "fsgate_app",
    "fsgate_services",
    "fsgate_infra",
    "fsgate_api",
    "fsgate_main",
];

/// Installs a JSON logger over daily rolling `fsgate.<date>.log` files in
/// `log_dir`.
///
/// Events from the workspace crates are kept at `level` and above; everything
/// else is off. A `FSGATE_LOG` filter, when set, replaces that default.
pub fn init_tracing(log_dir: &Path, level: Level) -> anyhow::Result<Guard> {
    let filter = EnvFilter::try_from_env("FSGATE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(directives(level)));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to open log directory {}", log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let json = tracing_subscriber::fmt::layer()
        .json()
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(writer)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json)
        .try_init()
        .context("Failed to install the log subscriber")?;

    info!(dir = %log_dir.display(), %level, "File logging started");
    Ok(Guard(guard))
}

/// Per-crate filter directives, e.g. `off,fsgate_app=debug,...`.
fn directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    LOG_TARGETS
        .iter()
        .fold(String::from("off"), |acc, target| format!("{acc},{target}={level}"))
}

/// Keeps the background log writer alive; logs are flushed when dropped.
pub struct Guard(#[allow(dead_code)] WorkerGuard);
