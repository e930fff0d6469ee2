//! Tier precedence, tombstones and conditional-empty fragments

use crate::common::{assert_file_content, file_paths, find, render, unit_names};
use anyhow::Result;
use mcrender::test_utils::{ControllerConfigFixture, TemplateTree};

#[test]
fn test_platform_tier_overrides_base() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file(
        "worker/00-worker/_base/files/kubelet.yaml",
        &TemplateTree::file_fragment("/etc/kubernetes/kubelet.conf", "base"),
    )?
    .file(
        "worker/00-worker/aws/files/kubelet.yaml",
        &TemplateTree::file_fragment("/etc/kubernetes/kubelet.conf", "aws"),
    )?
    .file(
        "worker/00-worker/gcp/files/kubelet.yaml",
        &TemplateTree::file_fragment("/etc/kubernetes/kubelet.conf", "gcp"),
    )?;

    let aws = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    assert_file_content(find(&aws, "worker", "00-worker"), "/etc/kubernetes/kubelet.conf", "aws");

    let gcp = render(&tree, &ControllerConfigFixture::platform("GCP"))?;
    assert_file_content(find(&gcp, "worker", "00-worker"), "/etc/kubernetes/kubelet.conf", "gcp");

    let azure = render(&tree, &ControllerConfigFixture::platform("Azure"))?;
    assert_file_content(find(&azure, "worker", "00-worker"), "/etc/kubernetes/kubelet.conf", "base");
    Ok(())
}

#[test]
fn test_sno_tier_wins_over_platform() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file("master/00-master/_base/files/a.yaml", &TemplateTree::file_fragment("/etc/a", "base"))?
        .file("master/00-master/on-prem/files/a.yaml", &TemplateTree::file_fragment("/etc/a", "on-prem"))?
        .file("master/00-master/baremetal/files/a.yaml", &TemplateTree::file_fragment("/etc/a", "bm"))?
        .file("master/00-master/sno/files/a.yaml", &TemplateTree::file_fragment("/etc/a", "sno"))?;

    let ha = render(&tree, &ControllerConfigFixture::platform("BareMetal"))?;
    assert_file_content(find(&ha, "master", "00-master"), "/etc/a", "bm");

    let sno = render(&tree, &ControllerConfigFixture::single_node("BareMetal"))?;
    assert_file_content(find(&sno, "master", "00-master"), "/etc/a", "sno");
    Ok(())
}

#[test]
fn test_zero_length_fragment_removes_lower_tier() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file(
        "worker/00-worker/_base/units/chronyd.yaml",
        &TemplateTree::unit_fragment("chronyd.service", "NTP"),
    )?
    .file(
        "worker/00-worker/_base/units/kubelet.yaml",
        &TemplateTree::unit_fragment("kubelet.service", "Kubelet"),
    )?
    .tombstone("worker/00-worker/aws/units/chronyd.yaml")?;

    let aws = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    assert_eq!(unit_names(find(&aws, "worker", "00-worker")), vec!["kubelet.service"]);

    // The tombstone only lives in the aws tier
    let gcp = render(&tree, &ControllerConfigFixture::platform("GCP"))?;
    assert_eq!(
        unit_names(find(&gcp, "worker", "00-worker")),
        vec!["chronyd.service", "kubelet.service"]
    );
    Ok(())
}

#[test]
fn test_tombstone_is_not_rendered() -> Result<()> {
    // A tombstone for a name that was never collected is a no-op, not an error
    let tree = TemplateTree::new()?;
    tree.file("worker/00-worker/_base/files/a.yaml", &TemplateTree::file_fragment("/etc/a", "a"))?
        .tombstone("worker/00-worker/aws/files/missing.yaml")?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    assert_eq!(file_paths(find(&configs, "worker", "00-worker")), vec!["/etc/a"]);
    Ok(())
}

#[test]
fn test_blank_render_keeps_lower_tier() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file(
        "worker/00-worker/_base/files/dns.yaml",
        &TemplateTree::file_fragment("/etc/resolv.conf", "base"),
    )?
    .file(
        "worker/00-worker/on-prem/files/dns.yaml",
        r#"{% if infra.status.platformStatus.type == "OpenStack" %}
path: /etc/resolv.conf
contents:
  inline: openstack
{% endif %}
"#,
    )?;

    let bm = render(&tree, &ControllerConfigFixture::platform("BareMetal"))?;
    assert_file_content(find(&bm, "worker", "00-worker"), "/etc/resolv.conf", "base");

    let osp = render(&tree, &ControllerConfigFixture::platform("OpenStack"))?;
    assert_file_content(find(&osp, "worker", "00-worker"), "/etc/resolv.conf", "openstack");
    Ok(())
}

#[test]
fn test_fragments_keyed_by_file_name_across_subdirectories() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file(
        "worker/00-worker/_base/files/kubelet/config.yaml",
        &TemplateTree::file_fragment("/etc/kubelet.conf", "base"),
    )?
    .file(
        "worker/00-worker/aws/files/config.yaml",
        &TemplateTree::file_fragment("/etc/kubelet.conf", "aws"),
    )?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    let mc = find(&configs, "worker", "00-worker");
    assert_eq!(file_paths(mc), vec!["/etc/kubelet.conf"]);
    assert_file_content(mc, "/etc/kubelet.conf", "aws");
    Ok(())
}

#[test]
fn test_output_sorted_by_fragment_name() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file("worker/00-worker/aws/files/b.yaml", &TemplateTree::file_fragment("/etc/b", "b"))?
        .file("worker/00-worker/_base/files/c.yaml", &TemplateTree::file_fragment("/etc/c", "c"))?
        .file("worker/00-worker/_base/files/x/a.yaml", &TemplateTree::file_fragment("/etc/a", "a"))?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    assert_eq!(file_paths(find(&configs, "worker", "00-worker")), vec!["/etc/a", "/etc/b", "/etc/c"]);
    Ok(())
}

#[test]
fn test_render_error_names_the_fragment() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.file("worker/00-worker/_base/files/broken.yaml", "path: {{ notAVariable }}\n")?;

    let err = render(&tree, &ControllerConfigFixture::platform("AWS")).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("worker/00-worker/_base/files/broken.yaml"), "{message}");
    assert!(message.contains("failed to create MachineConfig for role worker"), "{message}");
    Ok(())
}
