use std::io::Write;

use anyhow::Result;
use clap::Parser;
use fsgate_api::{FsGateAPI, init_tracing};
use fsgate_main::{Cli, execute};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!(error = %format!("{err:#}"), "Command failed");
        eprintln!("{}", serde_json::json!({ "error": format!("{err:#}") }));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.apply(FsGateAPI::from_env().config());

    let _guard = init_tracing(&config.cache_root.join("logs"), cli.log_level())?;

    let api = FsGateAPI::init(config);
    let mut stdout = std::io::stdout().lock();
    execute(&api, cli.command, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
