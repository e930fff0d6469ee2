//! Infrastructure status types.
//!
//! These mirror the subset of the cluster infrastructure API that the engine reads. The
//! wire format keeps one optional block per platform next to a `type` discriminator:
//!
//! ```yaml
//! platformStatus:
//!   type: BareMetal
//!   baremetal:
//!     apiServerInternalIPs: [192.168.111.5]
//!     ingressIPs: [192.168.111.4]
//!     loadBalancer:
//!       type: OpenShiftManagedDefault
//! ```
//!
//! In memory this becomes [`PlatformStatus`], a sum type keyed by platform whose variants
//! carry `Option<Block>`. A missing block (e.g. user-provisioned vSphere) is a case the
//! compiler makes every accessor handle, instead of a nil check that can be forgotten.

use serde::{Deserialize, Serialize};

/// Platform types as they appear in `platformStatus.type`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformType {
    Aws,
    AlibabaCloud,
    Azure,
    BareMetal,
    Gcp,
    Libvirt,
    OpenStack,
    None,
    Ovirt,
    VSphere,
    IbmCloud,
    KubeVirt,
    EquinixMetal,
    PowerVs,
    Nutanix,
    External,
    /// Empty or absent discriminator
    Unset,
    /// Any value this crate does not know, including reserved tier names
    Other(String),
}

impl PlatformType {
    /// The exact wire spelling, e.g. `oVirt` or `AWS`
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PlatformType::Aws => "AWS",
            PlatformType::AlibabaCloud => "AlibabaCloud",
            PlatformType::Azure => "Azure",
            PlatformType::BareMetal => "BareMetal",
            PlatformType::Gcp => "GCP",
            PlatformType::Libvirt => "Libvirt",
            PlatformType::OpenStack => "OpenStack",
            PlatformType::None => "None",
            PlatformType::Ovirt => "oVirt",
            PlatformType::VSphere => "VSphere",
            PlatformType::IbmCloud => "IBMCloud",
            PlatformType::KubeVirt => "KubeVirt",
            PlatformType::EquinixMetal => "EquinixMetal",
            PlatformType::PowerVs => "PowerVS",
            PlatformType::Nutanix => "Nutanix",
            PlatformType::External => "External",
            PlatformType::Unset => "",
            PlatformType::Other(raw) => raw,
        }
    }
}

impl From<&str> for PlatformType {
    fn from(s: &str) -> Self {
        match s {
            "AWS" => PlatformType::Aws,
            "AlibabaCloud" => PlatformType::AlibabaCloud,
            "Azure" => PlatformType::Azure,
            "BareMetal" => PlatformType::BareMetal,
            "GCP" => PlatformType::Gcp,
            "Libvirt" => PlatformType::Libvirt,
            "OpenStack" => PlatformType::OpenStack,
            "None" => PlatformType::None,
            "oVirt" => PlatformType::Ovirt,
            "VSphere" => PlatformType::VSphere,
            "IBMCloud" => PlatformType::IbmCloud,
            "KubeVirt" => PlatformType::KubeVirt,
            "EquinixMetal" => PlatformType::EquinixMetal,
            "PowerVS" => PlatformType::PowerVs,
            "Nutanix" => PlatformType::Nutanix,
            "External" => PlatformType::External,
            "" => PlatformType::Unset,
            other => PlatformType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control-plane topology of the cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyMode {
    #[default]
    HighlyAvailable,
    SingleReplica,
    External,
    /// Topologies added after this crate was written
    #[serde(other)]
    Unknown,
}

/// Who runs the API and ingress load balancers on an on-prem platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadBalancerType {
    #[default]
    OpenShiftManagedDefault,
    UserManaged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    #[serde(rename = "type", default)]
    pub lb_type: LoadBalancerType,
}

/// Status block shared by the on-prem platforms (bare metal, oVirt, OpenStack, vSphere, Nutanix)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnPremPlatformStatus {
    #[serde(rename = "apiServerInternalIPs", default, skip_serializing_if = "Vec::is_empty")]
    pub api_server_internal_ips: Vec<String>,

    #[serde(rename = "ingressIPs", default, skip_serializing_if = "Vec::is_empty")]
    pub ingress_ips: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsPlatformStatus {
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePlatformStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group_name: String,

    /// e.g. `AzurePublicCloud`, `AzureStackCloud`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cloud_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcpPlatformStatus {
    #[serde(rename = "projectID", default)]
    pub project_id: String,

    #[serde(default)]
    pub region: String,
}

/// Platform status keyed by platform
///
/// Exactly one platform is active; its block may still be missing, which several
/// accessors treat as "no data" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPlatformStatus", into = "RawPlatformStatus")]
pub enum PlatformStatus {
    Aws(Option<AwsPlatformStatus>),
    Azure(Option<AzurePlatformStatus>),
    Gcp(Option<GcpPlatformStatus>),
    BareMetal(Option<OnPremPlatformStatus>),
    Ovirt(Option<OnPremPlatformStatus>),
    OpenStack(Option<OnPremPlatformStatus>),
    VSphere(Option<OnPremPlatformStatus>),
    Nutanix(Option<OnPremPlatformStatus>),
    /// Platforms whose status block the engine never reads
    Other(PlatformType),
}

impl PlatformStatus {
    #[must_use]
    pub fn platform_type(&self) -> PlatformType {
        match self {
            PlatformStatus::Aws(_) => PlatformType::Aws,
            PlatformStatus::Azure(_) => PlatformType::Azure,
            PlatformStatus::Gcp(_) => PlatformType::Gcp,
            PlatformStatus::BareMetal(_) => PlatformType::BareMetal,
            PlatformStatus::Ovirt(_) => PlatformType::Ovirt,
            PlatformStatus::OpenStack(_) => PlatformType::OpenStack,
            PlatformStatus::VSphere(_) => PlatformType::VSphere,
            PlatformStatus::Nutanix(_) => PlatformType::Nutanix,
            PlatformStatus::Other(t) => t.clone(),
        }
    }

    /// The on-prem block, with `None` for non on-prem platforms as well
    ///
    /// Outer `None`: not an on-prem platform. Inner `None`: on-prem, block missing.
    #[must_use]
    pub fn on_prem(&self) -> Option<Option<&OnPremPlatformStatus>> {
        match self {
            PlatformStatus::BareMetal(s)
            | PlatformStatus::Ovirt(s)
            | PlatformStatus::OpenStack(s)
            | PlatformStatus::VSphere(s)
            | PlatformStatus::Nutanix(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

impl Default for PlatformStatus {
    fn default() -> Self {
        PlatformStatus::Other(PlatformType::Unset)
    }
}

/// Wire shape of `platformStatus`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawPlatformStatus {
    #[serde(rename = "type", default)]
    platform_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aws: Option<AwsPlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    azure: Option<AzurePlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gcp: Option<GcpPlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    baremetal: Option<OnPremPlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ovirt: Option<OnPremPlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    openstack: Option<OnPremPlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vsphere: Option<OnPremPlatformStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutanix: Option<OnPremPlatformStatus>,
}

impl From<RawPlatformStatus> for PlatformStatus {
    fn from(raw: RawPlatformStatus) -> Self {
        // Blocks belonging to other platforms are dropped
        match PlatformType::from(raw.platform_type.as_str()) {
            PlatformType::Aws => PlatformStatus::Aws(raw.aws),
            PlatformType::Azure => PlatformStatus::Azure(raw.azure),
            PlatformType::Gcp => PlatformStatus::Gcp(raw.gcp),
            PlatformType::BareMetal => PlatformStatus::BareMetal(raw.baremetal),
            PlatformType::Ovirt => PlatformStatus::Ovirt(raw.ovirt),
            PlatformType::OpenStack => PlatformStatus::OpenStack(raw.openstack),
            PlatformType::VSphere => PlatformStatus::VSphere(raw.vsphere),
            PlatformType::Nutanix => PlatformStatus::Nutanix(raw.nutanix),
            other => PlatformStatus::Other(other),
        }
    }
}

impl From<PlatformStatus> for RawPlatformStatus {
    fn from(status: PlatformStatus) -> Self {
        let mut raw = RawPlatformStatus {
            platform_type: status.platform_type().as_str().to_string(),
            ..Default::default()
        };
        match status {
            PlatformStatus::Aws(s) => raw.aws = s,
            PlatformStatus::Azure(s) => raw.azure = s,
            PlatformStatus::Gcp(s) => raw.gcp = s,
            PlatformStatus::BareMetal(s) => raw.baremetal = s,
            PlatformStatus::Ovirt(s) => raw.ovirt = s,
            PlatformStatus::OpenStack(s) => raw.openstack = s,
            PlatformStatus::VSphere(s) => raw.vsphere = s,
            PlatformStatus::Nutanix(s) => raw.nutanix = s,
            PlatformStatus::Other(_) => {}
        }
        raw
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_status: Option<PlatformStatus>,

    #[serde(default)]
    pub control_plane_topology: TopologyMode,

    #[serde(default)]
    pub infrastructure_topology: TopologyMode,

    #[serde(rename = "apiServerURL", default, skip_serializing_if = "String::is_empty")]
    pub api_server_url: String,

    #[serde(rename = "apiServerInternalURI", default, skip_serializing_if = "String::is_empty")]
    pub api_server_internal_uri: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub infrastructure_name: String,
}

impl InfrastructureStatus {
    /// Platform type, or [`PlatformType::Unset`] when there is no status block
    #[must_use]
    pub fn platform_type(&self) -> PlatformType {
        self.platform_status.as_ref().map_or(PlatformType::Unset, PlatformStatus::platform_type)
    }

    #[must_use]
    pub fn is_single_node(&self) -> bool {
        self.control_plane_topology == TopologyMode::SingleReplica
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infrastructure {
    #[serde(default)]
    pub status: InfrastructureStatus,
}
