//! Platform classification.
//!
//! Everything in this module is a pure function of the cluster's infrastructure status
//! (plus, for cloud-provider questions, a [`FeatureGateAccess`]). The template function
//! library exposes most of these as thin adapters, and the tier resolver uses
//! [`classify`] to decide which override directories apply.
//!
//! # Unsupported platforms
//!
//! Behavior for platforms outside the on-prem set differs per accessor and is kept that
//! way on purpose, since existing templates depend on it:
//!
//! | accessor                         | non on-prem platform | on-prem, block missing |
//! |----------------------------------|----------------------|------------------------|
//! | [`on_prem_short_name`]           | `""`                 | short name             |
//! | [`on_prem_ingress_ip`] (and API) | error                | `None`                 |
//! | [`on_prem_ingress_ips`] (and API)| error                | empty list             |
//! | [`is_managed_default_lb`]        | `true`               | `false`                |

pub mod feature_gates;
pub mod types;

pub use feature_gates::{FeatureGateAccess, FeatureGateError, FeatureGates};
pub use types::{
    Infrastructure, InfrastructureStatus, LoadBalancerType, OnPremPlatformStatus, PlatformStatus,
    PlatformType, TopologyMode,
};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::RenderError;

/// Tier directory applied to every platform; also reserved as a platform value
pub const PLATFORM_BASE: &str = "_base";
/// Identifier used for present but unsupported platform types
pub const PLATFORM_NONE: &str = "none";

const CLOUD_CONFIG_FLAG: &str = "--cloud-config=/etc/kubernetes/cloud.conf";

/// Result of classifying a cluster's infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Canonical lowercase platform identifier, also the platform tier directory name
    pub platform: String,
    pub on_prem: bool,
    pub single_node: bool,
}

/// Classify infrastructure into a platform identifier and topology flags
pub fn classify(infra: &InfrastructureStatus) -> Result<Classification, RenderError> {
    Ok(Classification {
        platform: platform_string(infra)?,
        on_prem: is_on_prem(&infra.platform_type()),
        single_node: infra.is_single_node(),
    })
}

/// Canonical lowercase platform identifier
///
/// # Errors
///
/// - [`RenderError::NoPlatformConfigured`] when no platform type is set
/// - [`RenderError::ReservedPlatform`] when the type is the base tier sentinel
///
/// Present but unrecognized types log a warning and map to [`PLATFORM_NONE`] so new
/// platforms can be provisioned before every template supports them.
pub fn platform_string(infra: &InfrastructureStatus) -> Result<String, RenderError> {
    let platform = infra.platform_type();
    match &platform {
        PlatformType::Unset => Err(RenderError::NoPlatformConfigured),
        PlatformType::Other(raw) if raw == PLATFORM_BASE => Err(RenderError::ReservedPlatform {
            platform: raw.clone(),
        }),
        PlatformType::Aws
        | PlatformType::AlibabaCloud
        | PlatformType::Azure
        | PlatformType::BareMetal
        | PlatformType::Gcp
        | PlatformType::OpenStack
        | PlatformType::Libvirt
        | PlatformType::Ovirt
        | PlatformType::VSphere
        | PlatformType::KubeVirt
        | PlatformType::PowerVs
        | PlatformType::None
        | PlatformType::Nutanix => Ok(platform.as_str().to_lowercase()),
        unsupported => {
            warn!("the controller config referenced an unsupported platform: {}", unsupported);
            Ok(PLATFORM_NONE.to_string())
        }
    }
}

/// Platforms that run their own load balancing and VIP management
#[must_use]
pub fn is_on_prem(platform: &PlatformType) -> bool {
    matches!(
        platform,
        PlatformType::BareMetal
            | PlatformType::Ovirt
            | PlatformType::OpenStack
            | PlatformType::VSphere
            | PlatformType::Nutanix
    )
}

/// Ask the feature gates, logging (not failing) when they cannot answer
fn external_cloud_provider(status: &PlatformStatus, gates: &dyn FeatureGateAccess) -> bool {
    match gates.is_cloud_provider_external(status) {
        Ok(external) => external,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

/// Kubelet `--cloud-provider` value
#[must_use]
pub fn cloud_provider(infra: &InfrastructureStatus, gates: &dyn FeatureGateAccess) -> String {
    let Some(status) = &infra.platform_status else {
        return String::new();
    };

    if external_cloud_provider(status, gates) {
        return "external".to_string();
    }

    match status {
        PlatformStatus::Aws(_)
        | PlatformStatus::Azure(_)
        | PlatformStatus::OpenStack(_)
        | PlatformStatus::VSphere(_) => status.platform_type().as_str().to_lowercase(),
        PlatformStatus::Gcp(_) => "gce".to_string(),
        _ => String::new(),
    }
}

/// Kubelet `--cloud-config` flag, only for in-tree providers that have a cloud config
#[must_use]
pub fn cloud_config_flag(
    cloud_provider_config: &str,
    infra: &InfrastructureStatus,
    gates: &dyn FeatureGateAccess,
) -> String {
    if cloud_provider_config.is_empty() {
        return String::new();
    }

    let status = infra.platform_status.clone().unwrap_or_default();
    if external_cloud_provider(&status, gates) {
        return String::new();
    }

    match status {
        PlatformStatus::Aws(_)
        | PlatformStatus::Azure(_)
        | PlatformStatus::Gcp(_)
        | PlatformStatus::OpenStack(_)
        | PlatformStatus::VSphere(_) => CLOUD_CONFIG_FLAG.to_string(),
        _ => String::new(),
    }
}

/// Short name used in on-prem service and static pod manifests
#[must_use]
pub fn on_prem_short_name(infra: &InfrastructureStatus) -> &'static str {
    match infra.platform_type() {
        PlatformType::BareMetal => "kni",
        PlatformType::Ovirt => "ovirt",
        PlatformType::OpenStack => "openstack",
        PlatformType::VSphere => "vsphere",
        PlatformType::Nutanix => "nutanix",
        _ => "",
    }
}

#[derive(Debug, Clone, Copy)]
enum Vip {
    Ingress,
    ApiServerInternal,
}

impl Vip {
    fn subject(self) -> &'static str {
        match self {
            Vip::Ingress => "Ingress IP",
            Vip::ApiServerInternal => "API Server Internal IP",
        }
    }

    fn field(self) -> &'static str {
        match self {
            Vip::Ingress => "ingressIPs",
            Vip::ApiServerInternal => "apiServerInternalIPs",
        }
    }

    fn list(self, block: &OnPremPlatformStatus) -> &[String] {
        match self {
            Vip::Ingress => &block.ingress_ips,
            Vip::ApiServerInternal => &block.api_server_internal_ips,
        }
    }
}

/// Resolve the on-prem block; `Ok(None)` means the block itself is missing
fn on_prem_block(
    infra: &InfrastructureStatus,
    vip: Vip,
) -> Result<(&PlatformStatus, Option<&OnPremPlatformStatus>), RenderError> {
    let status = infra.platform_status.as_ref().ok_or_else(|| RenderError::NoPlatformStatus {
        accessor: vip.subject().to_string(),
    })?;
    let block = status.on_prem().ok_or_else(|| RenderError::InvalidPlatform {
        accessor: vip.subject().to_string(),
        platform: status.platform_type().to_string(),
    })?;
    Ok((status, block))
}

fn first_vip(infra: &InfrastructureStatus, vip: Vip) -> Result<Option<String>, RenderError> {
    let (status, block) = on_prem_block(infra, vip)?;
    let Some(block) = block else {
        return Ok(None);
    };

    match vip.list(block).first() {
        Some(ip) => Ok(Some(ip.clone())),
        // Some vSphere install modes never populate the VIP lists
        None if matches!(status, PlatformStatus::VSphere(_)) => Ok(None),
        None => Err(RenderError::MissingPlatformData {
            platform: status.platform_type().to_string(),
            field: vip.field().to_string(),
        }),
    }
}

fn all_vips(infra: &InfrastructureStatus, vip: Vip) -> Result<Vec<String>, RenderError> {
    let (_, block) = on_prem_block(infra, vip)?;
    Ok(block.map(|b| vip.list(b).to_vec()).unwrap_or_default())
}

/// First ingress VIP of an on-prem platform
pub fn on_prem_ingress_ip(infra: &InfrastructureStatus) -> Result<Option<String>, RenderError> {
    first_vip(infra, Vip::Ingress)
}

/// All ingress VIPs of an on-prem platform
pub fn on_prem_ingress_ips(infra: &InfrastructureStatus) -> Result<Vec<String>, RenderError> {
    all_vips(infra, Vip::Ingress)
}

/// First API server internal VIP of an on-prem platform
pub fn on_prem_api_server_internal_ip(
    infra: &InfrastructureStatus,
) -> Result<Option<String>, RenderError> {
    first_vip(infra, Vip::ApiServerInternal)
}

/// All API server internal VIPs of an on-prem platform
pub fn on_prem_api_server_internal_ips(
    infra: &InfrastructureStatus,
) -> Result<Vec<String>, RenderError> {
    all_vips(infra, Vip::ApiServerInternal)
}

/// Whether the cluster runs the default in-cluster load balancer (haproxy, keepalived)
#[must_use]
pub fn is_managed_default_lb(infra: &InfrastructureStatus) -> bool {
    let Some(status) = &infra.platform_status else {
        return false;
    };

    match status.on_prem() {
        // New non on-prem platforms default to the managed load balancer
        None => true,
        Some(None) => {
            if matches!(status, PlatformStatus::VSphere(_)) {
                info!("VSphere UPI doesn't populate VSphere PlatformStatus field, not using the managed load balancer");
            }
            false
        }
        Some(Some(block)) => {
            // vSphere without VIPs means a user-managed load balancer
            if matches!(status, PlatformStatus::VSphere(_))
                && block.api_server_internal_ips.is_empty()
            {
                return false;
            }
            block.load_balancer.as_ref().map_or(LoadBalancerType::default(), |lb| lb.lb_type)
                == LoadBalancerType::OpenShiftManagedDefault
        }
    }
}
