//! Override tier resolution.
//!
//! A template repository layers content in *tiers*. For a given cluster the applicable
//! tiers, in ascending precedence, are:
//!
//! 1. `_base` - applies to every platform
//! 2. `on-prem` - only for on-prem platforms (bare metal, oVirt, OpenStack, vSphere, Nutanix)
//! 3. `<platform>` - the canonical platform identifier, e.g. `aws` or `baremetal`
//! 4. `sno` - only when the control plane runs as a single replica
//!
//! Later tiers override earlier ones when fragments share a file name. Tier directories
//! that do not exist are simply skipped.
//!
//! ```text
//! templates/
//! ├── common/<tier>/{files,units}/...
//! └── <role>/<name>/<tier>/{files,units}/...
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::core::RenderError;
use crate::platform::{Classification, PLATFORM_BASE};
use crate::utils::exists_dir;

/// Directory holding templates shared by every role
pub const COMMON_DIR: &str = "common";
/// Directory name of the on-prem tier
pub const ON_PREM_DIR: &str = "on-prem";
/// Directory name of the single-node tier
pub const SINGLE_NODE_DIR: &str = "sno";

/// One override layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tier {
    Base,
    OnPrem,
    Platform(String),
    SingleNode,
}

impl Tier {
    /// Directory name of this tier inside a template subtree
    #[must_use]
    pub fn dir_name(&self) -> &str {
        match self {
            Self::Base => PLATFORM_BASE,
            Self::OnPrem => ON_PREM_DIR,
            Self::Platform(id) => id,
            Self::SingleNode => SINGLE_NODE_DIR,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl Serialize for Tier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.dir_name())
    }
}

/// Ordered tiers (lowest precedence first) for a platform and topology
#[must_use]
pub fn tiers(platform: &str, on_prem: bool, single_node: bool) -> Vec<Tier> {
    let mut tiers = vec![Tier::Base];
    if on_prem {
        tiers.push(Tier::OnPrem);
    }
    tiers.push(Tier::Platform(platform.to_string()));
    if single_node {
        tiers.push(Tier::SingleNode);
    }
    tiers
}

/// Tiers for an already classified cluster
#[must_use]
pub fn tiers_for(classification: &Classification) -> Vec<Tier> {
    tiers(&classification.platform, classification.on_prem, classification.single_node)
}

/// Existing tier directories under one subtree, in precedence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierDirs(Vec<PathBuf>);

impl TierDirs {
    /// Tier directories of the shared `common` subtree of a repository root
    pub fn common(root: &Path, tiers: &[Tier]) -> Result<Self, RenderError> {
        Self::under(&root.join(COMMON_DIR), tiers)
    }

    /// Tier directories of one name directory (`<root>/<role>/<name>`)
    pub fn for_name(name_dir: &Path, tiers: &[Tier]) -> Result<Self, RenderError> {
        Self::under(name_dir, tiers)
    }

    fn under(base: &Path, tiers: &[Tier]) -> Result<Self, RenderError> {
        let mut dirs = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let dir = base.join(tier.dir_name());
            if exists_dir(&dir)? {
                dirs.push(dir);
            } else {
                debug!("Skipping missing tier directory {}", dir.display());
            }
        }
        Ok(Self(dirs))
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for TierDirs {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TierDirs {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
