//! Spooling decoded payloads to disk

use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write a payload to `path`, creating parent directories as needed
pub async fn write_bytes(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    fs::write(path, data).await?;
    Ok(())
}

/// Spool location for overview data fetched from `server` for `group`
///
/// The layout keeps one file per (group, server) pair so that refetching
/// overwrites the previous snapshot.
pub fn headers_path(root: &Path, group: &str, server: &str) -> PathBuf {
    root.join("headers").join(group).join(server).join("data.txt")
}
