//! Ignition 3 config shape and fragment schemas.
//!
//! File fragments are YAML documents describing one file:
//!
//! ```yaml
//! path: /etc/kubernetes/kubelet.conf
//! mode: 420
//! overwrite: true
//! contents:
//!   inline: |
//!     kind: KubeletConfiguration
//! ```
//!
//! Unit fragments describe one systemd unit:
//!
//! ```yaml
//! name: kubelet.service
//! enabled: true
//! contents: |
//!   [Unit]
//!   Description=Kubernetes Kubelet
//! dropins:
//!   - name: 10-mco-default-env.conf
//!     contents: ...
//! ```

use serde::{Deserialize, Serialize};

pub const IGNITION_VERSION: &str = "3.2.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionMeta {
    pub version: String,
}

impl Default for IgnitionMeta {
    fn default() -> Self {
        Self {
            version: IGNITION_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionConfig {
    #[serde(default)]
    pub ignition: IgnitionMeta,
    #[serde(default, skip_serializing_if = "Storage::is_empty")]
    pub storage: Storage,
    #[serde(default, skip_serializing_if = "Systemd::is_empty")]
    pub systemd: Systemd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,
}

impl Storage {
    fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Systemd {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<Unit>,
}

impl Systemd {
    fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(default)]
    pub contents: FileContents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropins: Vec<Dropin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

/// File fragment as written in the template repository
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileFragment {
    pub path: String,
    #[serde(default)]
    pub mode: Option<u32>,
    #[serde(default)]
    pub overwrite: Option<bool>,
    #[serde(default)]
    pub contents: FragmentContents,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentContents {
    #[serde(default)]
    pub inline: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Unit fragments use the Ignition unit shape directly
pub type UnitFragment = Unit;

/// Encode inline file content as a `data:` URL
#[must_use]
pub fn data_url(content: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(content.as_bytes()).collect();
    // form encoding writes spaces as '+'; a literal '+' is already %2B
    format!("data:,{}", encoded.replace('+', "%20"))
}
