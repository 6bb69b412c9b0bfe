use std::path::Path;

use anyhow::{Context, Result};
use fsgate_domain::HashAlgorithm;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use super::READ_CHUNK_SIZE;

impl crate::fs::FsGateFS {
    /// Streams the file through `algorithm` and returns the hex digest.
    pub async fn digest(path: impl AsRef<Path>, algorithm: HashAlgorithm) -> Result<String> {
        let path = path.as_ref();
        match algorithm {
            HashAlgorithm::Md5 => digest_with::<Md5>(path).await,
            HashAlgorithm::Sha1 => digest_with::<Sha1>(path).await,
            HashAlgorithm::Sha256 => digest_with::<Sha256>(path).await,
        }
    }
}

async fn digest_with<D: Digest>(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open file {}", path.display()))?;

    let mut hasher = D::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut chunk)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
