//! Feature-gate capability used to decide whether the cloud provider runs out of tree.
//!
//! The renderer never reads feature gates directly. It receives an implementation of
//! [`FeatureGateAccess`] and asks the one question it cares about: is the cloud
//! provider for this platform externalized? [`FeatureGates`] is the default
//! implementation, built from the enabled/disabled gate lists of the cluster.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::types::{PlatformStatus, PlatformType};

/// Gate that moves AWS, OpenStack and vSphere (and the others, as a fallback) out of tree
pub const EXTERNAL_CLOUD_PROVIDER: &str = "ExternalCloudProvider";
/// Azure-specific external cloud provider gate
pub const EXTERNAL_CLOUD_PROVIDER_AZURE: &str = "ExternalCloudProviderAzure";
/// GCP-specific external cloud provider gate
pub const EXTERNAL_CLOUD_PROVIDER_GCP: &str = "ExternalCloudProviderGCP";

/// Azure Stack Hub always uses the external provider
const AZURE_STACK_CLOUD: &str = "AzureStackCloud";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureGateError {
    /// The gate was neither enabled nor disabled in the observed set
    #[error("feature gate {0} has not been observed")]
    Unobserved(String),
}

/// Capability the function library needs from the cluster's feature gates
pub trait FeatureGateAccess: Send + Sync + std::fmt::Debug {
    /// Whether cloud-provider integration is externalized for the given platform
    fn is_cloud_provider_external(&self, status: &PlatformStatus) -> Result<bool, FeatureGateError>;
}

/// Observed feature-gate state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGates {
    #[serde(default)]
    pub enabled: BTreeSet<String>,

    #[serde(default)]
    pub disabled: BTreeSet<String>,
}

impl FeatureGates {
    pub fn new<I, J, S, T>(enabled: I, disabled: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            enabled: enabled.into_iter().map(Into::into).collect(),
            disabled: disabled.into_iter().map(Into::into).collect(),
        }
    }

    /// Look up a single gate; unknown gates are an error rather than `false`
    pub fn enabled(&self, gate: &str) -> Result<bool, FeatureGateError> {
        if self.enabled.contains(gate) {
            Ok(true)
        } else if self.disabled.contains(gate) {
            Ok(false)
        } else {
            Err(FeatureGateError::Unobserved(gate.to_string()))
        }
    }

    /// Platform gate first, falling back to the generic gate when the platform gate is unknown
    fn enabled_with_fallback(&self, gate: &str) -> Result<bool, FeatureGateError> {
        match self.enabled(gate) {
            Ok(true) => Ok(true),
            Ok(false) | Err(_) => self.enabled(EXTERNAL_CLOUD_PROVIDER),
        }
    }
}

impl FeatureGateAccess for FeatureGates {
    fn is_cloud_provider_external(&self, status: &PlatformStatus) -> Result<bool, FeatureGateError> {
        match status {
            PlatformStatus::Azure(block) => {
                if block.as_ref().is_some_and(|b| b.cloud_name == AZURE_STACK_CLOUD) {
                    return Ok(true);
                }
                self.enabled_with_fallback(EXTERNAL_CLOUD_PROVIDER_AZURE)
            }
            PlatformStatus::Gcp(_) => self.enabled_with_fallback(EXTERNAL_CLOUD_PROVIDER_GCP),
            PlatformStatus::Aws(_) | PlatformStatus::OpenStack(_) | PlatformStatus::VSphere(_) => {
                self.enabled(EXTERNAL_CLOUD_PROVIDER)
            }
            PlatformStatus::Nutanix(_) => Ok(true),
            PlatformStatus::Other(
                PlatformType::AlibabaCloud
                | PlatformType::IbmCloud
                | PlatformType::PowerVs
                | PlatformType::KubeVirt
                | PlatformType::External,
            ) => Ok(true),
            _ => Ok(false),
        }
    }
}
