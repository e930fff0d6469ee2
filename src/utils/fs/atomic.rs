//! Atomic file write operations using temp-and-rename strategy.
//!
//! Generated configuration is written to the output directory with these helpers so a
//! consumer watching that directory never sees a half-written object.

use crate::utils::fs::dirs::ensure_dir;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `path` via a temporary sibling file and a rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Write several files concurrently on the blocking pool.
///
/// All writes are attempted; failures are collected and reported together.
pub async fn atomic_write_multiple(files: Vec<(PathBuf, Vec<u8>)>) -> Result<()> {
    use futures::future::join_all;

    if files.is_empty() {
        return Ok(());
    }

    let tasks = files.into_iter().map(|(path, content)| {
        tokio::task::spawn_blocking(move || {
            atomic_write(&path, &content).with_context(|| format!("{}", path.display()))
        })
    });

    let mut errors = Vec::new();
    for result in join_all(tasks).await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => errors.push(format!("{e:#}")),
            Err(e) => errors.push(format!("write task failed: {e}")),
        }
    }

    if !errors.is_empty() {
        let error_msgs: Vec<String> = errors.into_iter().map(|error| format!("  {error}")).collect();
        return Err(anyhow::anyhow!(
            "Failed to write {} files:\n{}",
            error_msgs.len(),
            error_msgs.join("\n")
        ));
    }

    Ok(())
}
