use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Context;
use fsgate_api::{DownloadJob, NativeFileService};
use fsgate_app::transcode::encode;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{Command, DownloadArgs, WriteArgs};

/// Runs one command against the facade and writes its JSON output to `out`,
/// one document per line. Downloads emit each requested event as it
/// arrives, followed by the result.
pub async fn execute<A, W>(api: &A, command: Command, out: &mut W) -> anyhow::Result<()>
where
    A: NativeFileService,
    W: Write,
{
    debug!(?command, "Executing command");
    let value = match command {
        Command::Constants => to_value(api.get_constants())?,
        Command::ReadFile { path } => json!(api.read_file(&path).await?),
        Command::Exists { path } => json!(api.exists(&path).await?),
        Command::Mkdir { path } => {
            api.mkdir(&path).await?;
            Value::Null
        }
        Command::WriteFile(args) => {
            api.write_file(&args.path, &payload(&args)).await?;
            Value::Null
        }
        Command::AppendFile(args) => {
            api.append_file(&args.path, &payload(&args)).await?;
            Value::Null
        }
        Command::ReadAsset { path } => json!(api.read_file_assets(&path).await?),
        Command::AssetExists { path } => json!(api.exists_assets(&path).await?),
        Command::Copy { from, into } => {
            api.copy_file(&from, &into).await?;
            Value::Null
        }
        Command::Move { from, into } => {
            api.move_file(&from, &into).await?;
            Value::Null
        }
        Command::Unlink { path } => {
            api.unlink(&path).await?;
            Value::Null
        }
        Command::Hash { path, algorithm } => json!(api.hash(&path, &algorithm).await?),
        Command::Read { path, length, position } => json!(api.read(&path, length, position).await?),
        Command::Write { args, position } => {
            api.write(&args.path, &payload(&args), position).await?;
            Value::Null
        }
        Command::Touch { path, mtime } => json!(api.touch(&path, mtime).await?),
        Command::Stat { path } => to_value(api.stat(&path).await?)?,
        Command::ReadDir { path } => to_value(api.read_dir(&path).await?)?,
        Command::Download(args) => return download(api, args, out).await,
    };

    emit(out, &value)
}

async fn download<A: NativeFileService, W: Write>(
    api: &A,
    args: DownloadArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut job = DownloadJob::new(args.job_id, args.url, args.to_file)
        .headers(args.headers.into_iter().collect::<BTreeMap<_, _>>())
        .begin(args.begin)
        .progress(args.progress);
    job.progress_interval = args.progress_interval;
    job.progress_divider = args.progress_divider;

    let mut handle = api.download_file(job).await?;
    while let Some(event) = handle.next_event().await {
        emit(out, &to_value(event)?)?;
    }
    let result = handle.wait().await?;
    emit(out, &to_value(result)?)
}

fn payload(args: &WriteArgs) -> String {
    if args.text {
        encode(args.contents.as_bytes())
    } else {
        args.contents.clone()
    }
}

fn to_value(value: impl Serialize) -> anyhow::Result<Value> {
    serde_json::to_value(value).context("Failed to serialize command output")
}

fn emit<W: Write>(out: &mut W, value: &Value) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value).context("Failed to write command output")?;
    writeln!(out).context("Failed to write command output")?;
    Ok(())
}
