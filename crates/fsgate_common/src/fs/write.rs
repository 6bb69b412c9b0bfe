use std::io::SeekFrom;
use std::path::Path;

use anyhow::{Context, Result};
use fsgate_domain::WriteMode;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

impl crate::fs::FsGateFS {
    /// Writes `contents` according to `mode`, creating the file when absent.
    ///
    /// The handle is flushed and closed once, after the write settles, on the
    /// success and failure path alike.
    pub async fn write(path: impl AsRef<Path>, contents: &[u8], mode: WriteMode) -> Result<()> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Overwrite => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
            WriteMode::At(_) => options.write(true),
        };

        let mut file = options
            .open(path)
            .await
            .with_context(|| format!("Failed to open file {} for writing", path.display()))?;

        let written = write_contents(&mut file, contents, mode).await;
        drop(file);

        written.with_context(|| format!("Failed to write file {}", path.display()))
    }
}

async fn write_contents(file: &mut File, contents: &[u8], mode: WriteMode) -> std::io::Result<()> {
    if let WriteMode::At(offset) = mode {
        file.seek(SeekFrom::Start(offset)).await?;
    }
    file.write_all(contents).await?;
    file.flush().await
}
