//! Controller config document.
//!
//! The engine's cluster-specific input. Only the fields the engine itself interprets are
//! typed; everything else in the document is kept in [`ControllerConfigSpec::extra`] so
//! templates can still reference it (`{{ dns.spec.baseDomain }}` and the like).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::platform::{Infrastructure, InfrastructureStatus};

/// Cluster-wide proxy settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub http_proxy: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub https_proxy: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub no_proxy: String,
}

/// Specification of a controller config object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfigSpec {
    #[serde(rename = "clusterDNSIP", default, skip_serializing_if = "String::is_empty")]
    pub cluster_dns_ip: String,

    /// Raw cloud-provider configuration; empty means no cloud config is rendered
    #[serde(default)]
    pub cloud_provider_config: String,

    #[serde(rename = "cloudProviderCAData", default, skip_serializing_if = "String::is_empty")]
    pub cloud_provider_ca_data: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etcd_discovery_domain: String,

    #[serde(rename = "kubeAPIServerServingCAData", default, skip_serializing_if = "String::is_empty")]
    pub kube_api_server_serving_ca_data: String,

    #[serde(rename = "rootCAData", default, skip_serializing_if = "String::is_empty")]
    pub root_ca_data: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_trust_bundle: String,

    /// Component images by name
    #[serde(default)]
    pub images: BTreeMap<String, String>,

    #[serde(rename = "osImageURL", default, skip_serializing_if = "String::is_empty")]
    pub os_image_url: String,

    #[serde(rename = "baseOSContainerImage", default)]
    pub base_os_container_image: String,

    #[serde(rename = "baseOSExtensionsContainerImage", default, skip_serializing_if = "String::is_empty")]
    pub base_os_extensions_container_image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyStatus>,

    #[serde(default)]
    pub infra: Infrastructure,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_families: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_type: String,

    /// Fields the engine does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ControllerConfigSpec {
    /// Parse a YAML (or JSON) document holding either a full controller config object
    /// (with a top-level `spec:`) or a bare spec.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut doc: serde_yaml::Value =
            serde_yaml::from_str(content).context("Controller config is not valid YAML")?;

        if let serde_yaml::Value::Mapping(map) = &mut doc
            && let Some(spec @ serde_yaml::Value::Mapping(_)) = map.remove("spec")
        {
            doc = spec;
        }

        serde_yaml::from_value(doc).context("Controller config does not match the expected schema")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read controller config from {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse controller config from {}", path.display()))
    }

    #[must_use]
    pub fn infra_status(&self) -> &InfrastructureStatus {
        &self.infra.status
    }
}
