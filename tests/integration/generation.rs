//! Role and name walking, common templates and post-processing

use crate::common::{assert_file_content, file_paths, find, render};
use anyhow::Result;
use mcrender::config::ControllerConfigSpec;
use mcrender::constants::{
    CONTENT_FINGERPRINT_ANNOTATION, GENERATED_BY_CONTROLLER_VERSION_ANNOTATION, VERSION,
};
use mcrender::core::{RenderError, Role};
use mcrender::generator::{Generator, generate_machine_configs_for_role};
use mcrender::machineconfig::{BaseImageSource, ConfigBuilder, IgnitionBuilder, MachineConfig};
use mcrender::test_utils::{ControllerConfigFixture, TemplateTree};
use std::sync::Arc;

fn two_role_tree() -> Result<TemplateTree> {
    let tree = TemplateTree::new()?;
    tree.file("common/_base/files/ca.yaml", &TemplateTree::file_fragment("/etc/pki/ca.crt", "ca"))?
        .file("master/00-master/_base/files/m.yaml", &TemplateTree::file_fragment("/etc/m", "m"))?
        .file(
            "master/01-master-kubelet/_base/units/kubelet.yaml",
            &TemplateTree::unit_fragment("kubelet.service", "Kubelet"),
        )?
        .file("worker/00-worker/_base/files/w.yaml", &TemplateTree::file_fragment("/etc/w", "w"))?
        .file(
            "worker/01-worker-kubelet/_base/units/kubelet.yaml",
            &TemplateTree::unit_fragment("kubelet.service", "Kubelet"),
        )?;
    Ok(tree)
}

#[test]
fn test_generates_one_object_per_name_in_sorted_order() -> Result<()> {
    let tree = two_role_tree()?;
    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;

    let names: Vec<_> = configs.iter().map(MachineConfig::name).collect();
    assert_eq!(names, vec!["00-master", "01-master-kubelet", "00-worker", "01-worker-kubelet"]);
    Ok(())
}

#[test]
fn test_common_templates_only_in_first_name_per_role() -> Result<()> {
    let tree = two_role_tree()?;
    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;

    assert_eq!(file_paths(find(&configs, "master", "00-master")), vec!["/etc/pki/ca.crt", "/etc/m"]);
    assert!(file_paths(find(&configs, "master", "01-master-kubelet")).is_empty());
    assert_eq!(file_paths(find(&configs, "worker", "00-worker")), vec!["/etc/pki/ca.crt", "/etc/w"]);
    assert!(file_paths(find(&configs, "worker", "01-worker-kubelet")).is_empty());
    Ok(())
}

#[test]
fn test_name_tiers_override_common() -> Result<()> {
    let tree = two_role_tree()?;
    tree.file(
        "worker/00-worker/_base/files/ca.yaml",
        &TemplateTree::file_fragment("/etc/pki/ca.crt", "worker-ca"),
    )?
    .file(
        "common/aws/files/ca.yaml",
        &TemplateTree::file_fragment("/etc/pki/ca.crt", "aws-ca"),
    )?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    // Name tiers come after every common tier
    assert_file_content(find(&configs, "worker", "00-worker"), "/etc/pki/ca.crt", "worker-ca");
    assert_file_content(find(&configs, "master", "00-master"), "/etc/pki/ca.crt", "aws-ca");
    Ok(())
}

#[test]
fn test_custom_role_uses_worker_templates() -> Result<()> {
    let tree = two_role_tree()?;
    // A role directory of its own does not change where templates come from
    tree.dir("infra")?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    let infra = find(&configs, "infra", "00-worker");
    let worker = find(&configs, "worker", "00-worker");
    assert_eq!(infra.spec.config, worker.spec.config);
    assert_eq!(infra.metadata.labels["machineconfiguration.openshift.io/role"], "infra");

    let direct = generate_machine_configs_for_role(
        ControllerConfigFixture::platform("AWS").render_context(),
        &Role::from("gpu".to_string()),
        tree.root(),
    )?;
    let names: Vec<_> = direct.iter().map(MachineConfig::name).collect();
    assert_eq!(names, vec!["00-worker", "01-worker-kubelet"]);
    Ok(())
}

#[test]
fn test_non_directories_are_skipped() -> Result<()> {
    let tree = two_role_tree()?;
    tree.file("README.md", "# templates")?.file("worker/NOTES", "not a name")?;

    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;
    assert_eq!(configs.len(), 4);
    Ok(())
}

#[test]
fn test_post_processing() -> Result<()> {
    let tree = two_role_tree()?;
    let configs = render(&tree, &ControllerConfigFixture::platform("AWS"))?;

    for mc in &configs {
        assert_eq!(mc.spec.os_image_url, "quay.io/openshift/os@sha256:0123");
        assert_eq!(mc.metadata.annotations[GENERATED_BY_CONTROLLER_VERSION_ANNOTATION], VERSION);
        assert!(mc.metadata.annotations[CONTENT_FINGERPRINT_ANNOTATION].starts_with("sha256:"));
    }

    let kubelet_args = &find(&configs, "worker", "01-worker-kubelet").spec.kernel_arguments;
    assert_eq!(
        kubelet_args,
        &vec![
            "systemd.unified_cgroup_hierarchy=0".to_string(),
            "systemd.legacy_systemd_cgroup_controller=1".to_string(),
        ]
    );
    assert_eq!(find(&configs, "master", "01-master-kubelet").spec.kernel_arguments.len(), 2);
    assert!(find(&configs, "worker", "00-worker").spec.kernel_arguments.is_empty());
    Ok(())
}

#[test]
fn test_output_is_deterministic() -> Result<()> {
    // Same content written in a different order
    let first = two_role_tree()?;
    let second = TemplateTree::new()?;
    second
        .file(
            "worker/01-worker-kubelet/_base/units/kubelet.yaml",
            &TemplateTree::unit_fragment("kubelet.service", "Kubelet"),
        )?
        .file("worker/00-worker/_base/files/w.yaml", &TemplateTree::file_fragment("/etc/w", "w"))?
        .file(
            "master/01-master-kubelet/_base/units/kubelet.yaml",
            &TemplateTree::unit_fragment("kubelet.service", "Kubelet"),
        )?
        .file("master/00-master/_base/files/m.yaml", &TemplateTree::file_fragment("/etc/m", "m"))?
        .file("common/_base/files/ca.yaml", &TemplateTree::file_fragment("/etc/pki/ca.crt", "ca"))?;

    let cc = ControllerConfigFixture::platform("AWS");
    let runs = [render(&first, &cc)?, render(&first, &cc)?, render(&second, &cc)?];
    let serialized: Vec<String> =
        runs.iter().map(serde_yaml::to_string).collect::<Result<_, _>>()?;
    assert_eq!(serialized[0], serialized[1]);
    assert_eq!(serialized[0], serialized[2]);
    Ok(())
}

#[test]
fn test_no_platform_aborts() -> Result<()> {
    let tree = two_role_tree()?;
    let cc = ControllerConfigFixture {
        content: "spec:\n  infra:\n    status: {}\n".to_string(),
    };
    let err = render(&tree, &cc).unwrap_err();
    assert!(format!("{err:#}").contains("no platformStatus.type"), "{err:#}");
    Ok(())
}

struct PinnedImage;

impl BaseImageSource for PinnedImage {
    fn default_base_image(&self, _spec: &ControllerConfigSpec) -> String {
        "registry.example.com/os:pinned".to_string()
    }
}

#[test]
fn test_custom_base_image_source() -> Result<()> {
    let tree = two_role_tree()?;
    let generator =
        Generator::new(tree.root(), ControllerConfigFixture::platform("AWS").render_context())?
            .with_base_image_source(Arc::new(PinnedImage));

    for mc in generator.generate_all()? {
        assert_eq!(mc.spec.os_image_url, "registry.example.com/os:pinned");
    }
    Ok(())
}

/// Wraps the default builder and records how many fragments it saw
struct CountingBuilder;

impl ConfigBuilder for CountingBuilder {
    fn build(
        &self,
        role: &Role,
        name: &str,
        files: &[String],
        units: &[String],
    ) -> Result<MachineConfig, RenderError> {
        let mut mc = IgnitionBuilder.build(role, name, files, units)?;
        mc.annotate("example.com/fragments", (files.len() + units.len()).to_string());
        Ok(mc)
    }
}

#[test]
fn test_custom_config_builder() -> Result<()> {
    let tree = two_role_tree()?;
    let generator =
        Generator::new(tree.root(), ControllerConfigFixture::platform("AWS").render_context())?
            .with_builder(Arc::new(CountingBuilder));

    let configs = generator.generate_all()?;
    let counts: Vec<_> =
        configs.iter().map(|mc| mc.metadata.annotations["example.com/fragments"].as_str()).collect();
    assert_eq!(counts, vec!["2", "1", "2", "1"]);
    // Post-processing still applies
    assert_eq!(find(&configs, "worker", "01-worker-kubelet").spec.kernel_arguments.len(), 2);
    Ok(())
}
