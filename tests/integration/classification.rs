//! Platform identifiers and tier lists from controller configs

use anyhow::Result;
use mcrender::core::RenderError;
use mcrender::platform::classify;
use mcrender::resolver::tiers_for;
use mcrender::test_utils::ControllerConfigFixture;

fn tier_names(cc: &ControllerConfigFixture) -> Result<Vec<String>> {
    let spec = cc.spec();
    let classification = classify(spec.infra_status())?;
    Ok(tiers_for(&classification).iter().map(ToString::to_string).collect())
}

#[test]
fn test_baremetal_single_node_tiers() -> Result<()> {
    assert_eq!(
        tier_names(&ControllerConfigFixture::single_node("BareMetal"))?,
        vec!["_base", "on-prem", "baremetal", "sno"]
    );
    Ok(())
}

#[test]
fn test_cloud_highly_available_tiers() -> Result<()> {
    assert_eq!(tier_names(&ControllerConfigFixture::platform("AWS"))?, vec!["_base", "aws"]);
    assert_eq!(tier_names(&ControllerConfigFixture::platform("GCP"))?, vec!["_base", "gcp"]);
    assert_eq!(
        tier_names(&ControllerConfigFixture::single_node("Azure"))?,
        vec!["_base", "azure", "sno"]
    );
    Ok(())
}

#[test]
fn test_on_prem_platforms() -> Result<()> {
    for (platform, id) in [
        ("OpenStack", "openstack"),
        ("oVirt", "ovirt"),
        ("VSphere", "vsphere"),
        ("Nutanix", "nutanix"),
    ] {
        assert_eq!(
            tier_names(&ControllerConfigFixture::platform(platform))?,
            vec!["_base", "on-prem", id],
            "{platform}"
        );
    }
    Ok(())
}

#[test]
fn test_unsupported_platforms_map_to_none() -> Result<()> {
    assert_eq!(tier_names(&ControllerConfigFixture::platform("None"))?, vec!["_base", "none"]);
    assert_eq!(
        tier_names(&ControllerConfigFixture::platform("EquinixMetal"))?,
        vec!["_base", "none"]
    );
    assert_eq!(
        tier_names(&ControllerConfigFixture::platform("SomeFuturePlatform"))?,
        vec!["_base", "none"]
    );
    Ok(())
}

#[test]
fn test_reserved_platform_rejected() {
    let spec = ControllerConfigFixture::platform("_base").spec();
    let err = classify(spec.infra_status()).unwrap_err();
    assert!(matches!(err, RenderError::ReservedPlatform { .. }));
}
