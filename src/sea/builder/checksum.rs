//! Artifact checksum calculation.

use crate::sea::{Result, error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 of a file and returns it with the file size.
///
/// Reads in 64KB chunks; the runtime binary is tens of megabytes.
///
/// # Returns
///
/// * `Ok((String, u64))` - Hex-encoded hash (64 characters) and byte count
/// * `Err` - If the file cannot be read
pub async fn calculate_sha256(file_path: &Path) -> Result<(String, u64)> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];
    let mut size = 0u64;

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        size += n as u64;
        hasher.update(&buffer[..n]);
    }

    Ok((format!("{:x}", hasher.finalize()), size))
}
