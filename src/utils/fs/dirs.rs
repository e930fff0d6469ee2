//! Directory probing and listing for the template repository.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::RenderError;

/// Returns `true` if `path` is a directory, `false` if it does not exist.
///
/// # Errors
///
/// - [`RenderError::FileSystemError`] when the path cannot be inspected
/// - [`RenderError::NotADirectory`] when the path exists but is something else
pub fn exists_dir(path: &Path) -> Result<bool, RenderError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(RenderError::NotADirectory {
            path: path.display().to_string(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(_) => Err(RenderError::FileSystemError {
            operation: "open dir".to_string(),
            path: path.display().to_string(),
        }),
    }
}

/// A directory entry found while listing a template level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory sorted by entry name.
///
/// Processing order of roles and names carries meaning (the first name of a role
/// receives the common templates), so the order is fixed here instead of relying on
/// the platform's `read_dir` order.
pub fn read_dir_sorted(path: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in
        fs::read_dir(path).with_context(|| format!("Failed to read directory: {}", path.display()))?
    {
        let entry =
            entry.with_context(|| format!("Failed to read entry in: {}", path.display()))?;
        // Follow symlinks so a linked name directory counts as a directory
        let is_dir = entry.path().is_dir();
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Create `path` and its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}
