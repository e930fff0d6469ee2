//! Common helpers for mcrender integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::Result;
use mcrender::generator::generate_template_machine_configs;
use mcrender::machineconfig::MachineConfig;
use mcrender::machineconfig::ignition::data_url;
use mcrender::test_utils::{ControllerConfigFixture, TemplateTree};

/// Render every object in `tree` against `cc`
pub fn render(tree: &TemplateTree, cc: &ControllerConfigFixture) -> Result<Vec<MachineConfig>> {
    mcrender::test_utils::init_test_logging(None);
    generate_template_machine_configs(cc.render_context(), tree.root())
}

/// Find the object named `name` labelled with `role`
pub fn find<'a>(configs: &'a [MachineConfig], role: &str, name: &str) -> &'a MachineConfig {
    configs
        .iter()
        .find(|mc| {
            mc.name() == name
                && mc.metadata.labels.get("machineconfiguration.openshift.io/role").map(String::as_str)
                    == Some(role)
        })
        .unwrap_or_else(|| panic!("no MachineConfig {name} for role {role}"))
}

/// Paths of every file in the object, in emitted order
pub fn file_paths(mc: &MachineConfig) -> Vec<&str> {
    mc.spec.config.storage.files.iter().map(|f| f.path.as_str()).collect()
}

/// Unit names in emitted order
pub fn unit_names(mc: &MachineConfig) -> Vec<&str> {
    mc.spec.config.systemd.units.iter().map(|u| u.name.as_str()).collect()
}

/// Assert that the file at `path` carries `inline` as its contents
pub fn assert_file_content(mc: &MachineConfig, path: &str, inline: &str) {
    let file = mc
        .spec
        .config
        .storage
        .files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("{} has no file {path}", mc.name()));
    assert_eq!(file.contents.source.as_deref(), Some(data_url(inline).as_str()), "contents of {path}");
}
