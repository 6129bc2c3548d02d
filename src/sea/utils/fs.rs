//! File system utilities for the pipeline.
//!
//! Removal helpers are idempotent: a path that is already gone counts as
//! removed.

use crate::sea::error::{Error, Result};
use std::{io, path::Path};
use tokio::fs;

/// Copies a regular file, replacing the destination and creating its parent
/// directories as needed.
///
/// The destination is unlinked first so a previous output that is still
/// running does not block the copy. Fails if the source path is a directory
/// or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> io::Result<u64> {
    if !from.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a readable file", from.display()),
        ));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    match fs::remove_file(to).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::copy(from, to).await
}

/// Removes a file if it exists. Returns whether something was removed.
pub async fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Fs {
            context: "removing",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Removes a directory only if it is empty; anything else is left alone.
pub async fn remove_dir_if_empty(path: &Path) {
    if let Err(e) = fs::remove_dir(path).await {
        log::debug!("Keeping {}: {}", path.display(), e);
    }
}
