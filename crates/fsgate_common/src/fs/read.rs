use std::io::SeekFrom;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::READ_CHUNK_SIZE;

impl crate::fs::FsGateFS {
    /// Reads the whole file in fixed-size chunks until end of stream.
    pub async fn read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let mut file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        let mut content = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = file
                .read(&mut chunk)
                .await
                .with_context(|| format!("Failed to read file {}", path.display()))?;
            if n == 0 {
                break;
            }
            content.extend_from_slice(&chunk[..n]);
        }

        Ok(content)
    }

    /// Reads up to `length` bytes starting at `offset`. Fewer bytes come back
    /// when the file ends first.
    pub async fn read_range(path: impl AsRef<Path>, offset: u64, length: usize) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let mut file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;
        file.seek(SeekFrom::Start(offset))
            .await
            .with_context(|| format!("Failed to seek to {offset} in {}", path.display()))?;

        let mut content = Vec::with_capacity(length.min(READ_CHUNK_SIZE));
        (&mut file)
            .take(length as u64)
            .read_to_end(&mut content)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(content)
    }
}
