//! Generated configuration objects.
//!
//! [`MachineConfig`] is the output of the engine: one object per (role, name), carrying
//! an Ignition-shaped config built from the merged fragments. Building it is delegated
//! to a [`ConfigBuilder`] and the default OS image comes from a [`BaseImageSource`], so
//! callers can swap either one.

mod base_image;
mod builder;
pub mod ignition;

pub use base_image::{BaseImageSource, SpecBaseImage};
pub use builder::{ConfigBuilder, IgnitionBuilder};
pub use ignition::IgnitionConfig;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: &str = "machineconfiguration.openshift.io/v1";
pub const KIND: &str = "MachineConfig";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfigSpec {
    #[serde(rename = "osImageURL", default)]
    pub os_image_url: String,
    #[serde(default)]
    pub config: IgnitionConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kernel_arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: MachineConfigSpec,
}

impl MachineConfig {
    /// Empty object with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ObjectMeta {
                name: name.into(),
                ..Default::default()
            },
            spec: MachineConfigSpec::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.annotations.insert(key.into(), value.into());
    }

    pub fn label(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.labels.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_config_serialization() {
        let mut mc = MachineConfig::new("00-worker");
        mc.label("machineconfiguration.openshift.io/role", "worker");
        mc.spec.os_image_url = "quay.io/os@sha256:1".to_string();

        let yaml = serde_yaml::to_string(&mc).unwrap();
        assert!(yaml.contains("apiVersion: machineconfiguration.openshift.io/v1"));
        assert!(yaml.contains("kind: MachineConfig"));
        assert!(yaml.contains("osImageURL: quay.io/os@sha256:1"));
        assert!(!yaml.contains("kernelArguments"));
        assert!(!yaml.contains("annotations"));

        let back: MachineConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, mc);
    }
}
