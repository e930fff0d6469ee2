//! Engine settings (`~/.mcrender/config.toml`).
//!
//! Settings carry everything the engine needs that is not part of the controller config
//! document: where the template repository lives, which feature gates are observed,
//! overrides for template constants and where to read the pull secret from.
//!
//! ```toml
//! templates_dir = "/usr/share/mcrender/templates"
//! pull_secret_file = "/run/secrets/pull-secret.json"
//!
//! [feature_gates]
//! enabled = ["ExternalCloudProvider"]
//! disabled = ["ExternalCloudProviderAzure", "ExternalCloudProviderGCP"]
//!
//! [constants]
//! KubeletAuthFile = "/var/lib/kubelet/auth.json"
//! ```
//!
//! # Location
//!
//! 1. An explicit path (the `--settings` flag)
//! 2. The `MCRENDER_CONFIG` environment variable
//! 3. `~/.mcrender/config.toml` (`%LOCALAPPDATA%\mcrender\config.toml` on Windows)
//!
//! A missing file at the default location yields default settings. An explicit path that
//! does not exist is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::default_constants;
use crate::platform::FeatureGates;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV_VAR: &str = "MCRENDER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Template repository root used when `--templates` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,

    #[serde(default)]
    pub feature_gates: FeatureGateSettings,

    /// Overrides layered over the default template constants
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constants: BTreeMap<String, String>,

    /// File whose content is exposed to templates as `pullSecret`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_secret_file: Option<PathBuf>,
}

/// Observed feature gates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGateSettings {
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Settings {
    /// Load settings, honoring an explicit path, then the environment, then the default
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Self::load_from(Path::new(&path)).await;
        }

        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load settings from a specific TOML file
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// Platform-specific default settings location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("mcrender")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".mcrender")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Feature gate accessor built from the observed gates
    #[must_use]
    pub fn feature_gates(&self) -> FeatureGates {
        FeatureGates::new(&self.feature_gates.enabled, &self.feature_gates.disabled)
    }

    /// Template constants, or `None` to let the renderer use the defaults
    #[must_use]
    pub fn constants(&self) -> Option<BTreeMap<String, String>> {
        if self.constants.is_empty() {
            return None;
        }
        let mut constants = default_constants();
        constants.extend(self.constants.iter().map(|(k, v)| (k.clone(), v.clone())));
        Some(constants)
    }

    /// Read the configured pull secret; empty when none is configured
    pub async fn pull_secret(&self) -> Result<String> {
        match &self.pull_secret_file {
            Some(path) => fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read pull secret from {}", path.display())),
            None => Ok(String::new()),
        }
    }
}
