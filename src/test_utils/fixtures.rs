//! Fixtures for template repositories and controller configs

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::config::ControllerConfigSpec;
use crate::platform::FeatureGates;
use crate::templating::RenderContext;

/// A template repository in a temporary directory.
///
/// Paths are relative to the repository root, e.g.
/// `worker/00-worker/_base/files/hostname.yaml`.
pub struct TemplateTree {
    temp: TempDir,
}

impl TemplateTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp.path().join(rel)
    }

    /// Write a fragment, creating parent directories
    pub fn file(&self, rel: &str, content: &str) -> Result<&Self> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(self)
    }

    /// Write a zero-length fragment
    pub fn tombstone(&self, rel: &str) -> Result<&Self> {
        self.file(rel, "")
    }

    /// Create an empty directory
    pub fn dir(&self, rel: &str) -> Result<&Self> {
        let path = self.path(rel);
        fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(self)
    }

    /// A file fragment with inline contents
    #[must_use]
    pub fn file_fragment(path: &str, inline: &str) -> String {
        format!("path: {path}\nmode: 420\ncontents:\n  inline: {inline:?}\n")
    }

    /// A unit fragment with a one-line description
    #[must_use]
    pub fn unit_fragment(name: &str, description: &str) -> String {
        format!("name: {name}\nenabled: true\ncontents: |\n  [Unit]\n  Description={description}\n")
    }
}

/// Controller config documents for tests
#[derive(Debug, Clone)]
pub struct ControllerConfigFixture {
    pub content: String,
}

impl ControllerConfigFixture {
    /// A cluster on `platform` with a highly available control plane
    pub fn platform(platform: &str) -> Self {
        Self::with_topology(platform, "HighlyAvailable")
    }

    /// A cluster on `platform` with a single-replica control plane
    pub fn single_node(platform: &str) -> Self {
        Self::with_topology(platform, "SingleReplica")
    }

    fn with_topology(platform: &str, topology: &str) -> Self {
        Self {
            content: format!(
                r#"apiVersion: machineconfiguration.openshift.io/v1
kind: ControllerConfig
metadata:
  name: machine-config-controller
spec:
  clusterDNSIP: 172.30.0.10
  baseOSContainerImage: quay.io/openshift/os@sha256:0123
  infra:
    status:
      controlPlaneTopology: {topology}
      apiServerInternalURI: https://api-int.example.com:6443
      platformStatus:
        type: {platform}
"#
            ),
        }
    }

    /// A bare-metal cluster with API and ingress VIPs
    pub fn baremetal_with_vips() -> Self {
        Self {
            content: r#"spec:
  baseOSContainerImage: quay.io/openshift/os@sha256:0123
  infra:
    status:
      controlPlaneTopology: HighlyAvailable
      platformStatus:
        type: BareMetal
        baremetal:
          apiServerInternalIPs: ["192.168.111.5", "fd2e:6f44:5dd8::5"]
          ingressIPs: ["192.168.111.4"]
"#
            .to_string(),
        }
    }

    pub fn spec(&self) -> ControllerConfigSpec {
        ControllerConfigSpec::from_yaml(&self.content)
            .unwrap_or_else(|e| panic!("fixture controller config is invalid: {e:#}"))
    }

    /// Render context with no feature gates observed
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(self.spec(), Arc::new(FeatureGates::default()))
    }

    /// Write the document to `dir/cc.yaml` and return its path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("cc.yaml");
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
