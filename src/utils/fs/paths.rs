//! Path display helpers.

use std::path::Path;

/// Path of `path` relative to `root`, with `/` separators on every platform.
///
/// Used as the template identifier for fragments so error messages and logs read the
/// same on every host. Falls back to the full path when `path` is outside `root`.
#[must_use]
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
