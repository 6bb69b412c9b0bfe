use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use fsgate_api::FsGateConfig;
use tracing::Level;

/// Command-line host for the file-access facade. Every command prints its
/// result as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "fsgate", version, about)]
pub struct Cli {
    /// Log debug events, not just lifecycle events, to the cache directory
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Sandbox root relative paths resolve against
    #[arg(long, global = true)]
    pub sandbox: Option<PathBuf>,

    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,

    /// Create missing parent directories before writing
    #[arg(long, global = true)]
    pub create_intermediate_dirs: bool,

    /// Allow copies whose source and destination share a file name
    #[arg(long, global = true)]
    pub no_copy_name_guard: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::INFO }
    }

    /// Overrides the environment-derived configuration with explicit flags.
    pub fn apply(&self, mut config: FsGateConfig) -> FsGateConfig {
        if let Some(sandbox) = &self.sandbox {
            config.assets_root = sandbox.join("assets");
            config.sandbox_root = sandbox.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache_root = cache.clone();
        }
        if let Some(assets) = &self.assets {
            config.assets_root = assets.clone();
        }
        if self.create_intermediate_dirs {
            config.create_intermediate_dirs = true;
        }
        if self.no_copy_name_guard {
            config.copy_name_guard = false;
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the sandbox and cache roots and the entry type tags
    Constants,
    ReadFile { path: PathBuf },
    Exists { path: PathBuf },
    Mkdir { path: PathBuf },
    WriteFile(WriteArgs),
    AppendFile(WriteArgs),
    ReadAsset { path: PathBuf },
    AssetExists { path: PathBuf },
    Copy { from: PathBuf, into: PathBuf },
    Move { from: PathBuf, into: PathBuf },
    Unlink { path: PathBuf },
    Hash {
        path: PathBuf,
        #[arg(long, short, default_value = "sha256")]
        algorithm: String,
    },
    /// Read `length` bytes starting at `position`
    Read { path: PathBuf, length: usize, position: u64 },
    /// Write at `position`; a negative position appends
    Write {
        #[command(flatten)]
        args: WriteArgs,
        #[arg(long, allow_negative_numbers = true, default_value_t = -1)]
        position: i64,
    },
    Touch {
        path: PathBuf,
        /// RFC 3339 modification time
        #[arg(long)]
        mtime: Option<DateTime<Utc>>,
    },
    Stat { path: PathBuf },
    ReadDir { path: PathBuf },
    Download(DownloadArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct WriteArgs {
    pub path: PathBuf,
    /// Base64 payload, or plain text with `--text`
    pub contents: String,
    #[arg(long)]
    pub text: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DownloadArgs {
    pub url: String,
    pub to_file: PathBuf,
    #[arg(long, default_value_t = 1)]
    pub job_id: u64,
    /// Request header as `name=value`; repeatable
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
    /// Report the response status and headers
    #[arg(long)]
    pub begin: bool,
    /// Report transfer progress
    #[arg(long)]
    pub progress: bool,
    #[arg(long)]
    pub progress_interval: Option<u64>,
    #[arg(long)]
    pub progress_divider: Option<u32>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got {raw}"))
}
