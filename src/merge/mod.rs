//! Fragment collection and tier merging.
//!
//! Each tier directory may contain a `files` and a `units` area. Fragments in an area are
//! keyed by their *file name* (subdirectories only organize the repository), and tiers
//! are applied lowest precedence first, so a fragment in a later tier replaces the
//! same-named fragment from an earlier one.
//!
//! Two special cases let higher tiers remove or conditionally keep content:
//!
//! - A **zero-length file** is a tombstone: it deletes the same-named entry collected so
//!   far and is never rendered.
//! - A fragment whose **rendered output is blank** (only whitespace) is dropped without
//!   touching an existing entry, so a platform-conditional template that renders to
//!   nothing leaves the lower tier's version in place.

pub mod serializer;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::constants::{FILES_DIR, UNITS_DIR};
use crate::core::RenderError;
use crate::templating::TemplateRenderer;
use crate::utils::{exists_dir, relative_display};

pub use serializer::{content_fingerprint, sorted_contents};

/// Rendered fragments of one area, keyed by file name
pub type MergedSet = BTreeMap<String, String>;

/// Merged `files` and `units` for one configuration name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub files: MergedSet,
    pub units: MergedSet,
}

impl Fragments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.units.is_empty()
    }
}

/// Merges tier directories in precedence order.
///
/// `root` is the template repository root; fragment paths relative to it become
/// template identifiers.
pub struct FragmentMerger<'a> {
    root: &'a Path,
    renderer: &'a TemplateRenderer,
}

impl<'a> FragmentMerger<'a> {
    pub fn new(root: &'a Path, renderer: &'a TemplateRenderer) -> Self {
        Self {
            root,
            renderer,
        }
    }

    /// Merge every tier directory, lowest precedence first.
    ///
    /// Any filesystem or render error aborts the whole merge.
    pub fn merge<I, P>(&self, tier_dirs: I) -> Result<Fragments>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fragments = Fragments::default();
        for dir in tier_dirs {
            let dir = dir.as_ref();
            debug!("Merging tier {}", relative_display(self.root, dir));

            let files = dir.join(FILES_DIR);
            if exists_dir(&files)? {
                self.collect_area(&mut fragments.files, &files)?;
            }

            let units = dir.join(UNITS_DIR);
            if exists_dir(&units)? {
                self.collect_area(&mut fragments.units, &units)?;
            }
        }
        Ok(fragments)
    }

    /// Walk one area recursively in file-name order and apply each fragment to `set`
    pub fn collect_area(&self, set: &mut MergedSet, area: &Path) -> Result<()> {
        for entry in WalkDir::new(area).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(area).display().to_string();
                anyhow::Error::new(RenderError::FileSystemError {
                    operation: "walk".to_string(),
                    path,
                })
                .context(e)
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            self.apply(set, name, entry.path())?;
        }
        Ok(())
    }

    fn apply(&self, set: &mut MergedSet, name: String, path: &Path) -> Result<()> {
        let rel = relative_display(self.root, path);

        let data = fs::read(path).with_context(|| format!("failed to read file {:?}", path))?;

        if data.is_empty() {
            if set.remove(&name).is_some() {
                debug!("Tombstone {} removed {}", rel, name);
            }
            return Ok(());
        }

        let content = String::from_utf8(data)
            .with_context(|| format!("failed to read file {:?}: not valid UTF-8", path))?;
        let rendered = self
            .renderer
            .render(&rel, &content)
            .with_context(|| format!("failed to render template {}", rel))?;

        if rendered.trim().is_empty() {
            trace!("{} rendered empty, skipping", rel);
            return Ok(());
        }

        set.insert(name, rendered);
        Ok(())
    }
}
