//! The `render` and `tiers` commands end to end

use anyhow::Result;
use assert_cmd::Command;
use mcrender::machineconfig::MachineConfig;
use mcrender::test_utils::{ControllerConfigFixture, TemplateTree};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `mcrender` isolated from the user's settings
fn mcrender(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mcrender").unwrap();
    cmd.env("HOME", home.path()).env_remove("MCRENDER_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn sample_tree() -> Result<TemplateTree> {
    let tree = TemplateTree::new()?;
    tree.file("common/_base/files/ca.yaml", &TemplateTree::file_fragment("/etc/pki/ca.crt", "ca"))?
        .file("master/00-master/_base/files/m.yaml", &TemplateTree::file_fragment("/etc/m", "m"))?
        .file("worker/00-worker/_base/files/w.yaml", &TemplateTree::file_fragment("/etc/w", "w"))?
        .file(
            "worker/01-worker-kubelet/_base/units/kubelet.yaml",
            &TemplateTree::unit_fragment("kubelet.service", "Kubelet"),
        )?;
    Ok(tree)
}

#[test]
fn test_render_to_stdout_yaml() -> Result<()> {
    let home = TempDir::new()?;
    let tree = sample_tree()?;
    let cc = ControllerConfigFixture::platform("AWS").write_to(home.path())?;

    mcrender(&home)
        .arg("render")
        .arg("--templates")
        .arg(tree.root())
        .arg("--controller-config")
        .arg(&cc)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: 00-master"))
        .stdout(predicate::str::contains("name: 01-worker-kubelet"))
        .stdout(predicate::str::contains("systemd.unified_cgroup_hierarchy=0"))
        .stdout(predicate::str::contains("kind: MachineConfig"));
    Ok(())
}

#[test]
fn test_render_json_is_parseable() -> Result<()> {
    let home = TempDir::new()?;
    let tree = sample_tree()?;
    let cc = ControllerConfigFixture::platform("AWS").write_to(home.path())?;

    let output = mcrender(&home)
        .args(["--quiet", "render", "--format", "json", "-c"])
        .arg(&cc)
        .arg("-t")
        .arg(tree.root())
        .output()?;
    assert!(output.status.success());

    let configs: Vec<MachineConfig> = serde_json::from_slice(&output.stdout)?;
    let names: Vec<_> = configs.iter().map(MachineConfig::name).collect();
    assert_eq!(names, vec!["00-master", "00-worker", "01-worker-kubelet"]);
    Ok(())
}

#[test]
fn test_render_to_output_directory() -> Result<()> {
    let home = TempDir::new()?;
    let out = TempDir::new()?;
    let tree = sample_tree()?;
    let cc = ControllerConfigFixture::platform("AWS").write_to(home.path())?;

    mcrender(&home)
        .arg("render")
        .arg("-t")
        .arg(tree.root())
        .arg("-c")
        .arg(&cc)
        .arg("--output")
        .arg(out.path())
        .args(["--role", "infra", "--role", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 machine configs"));

    assert!(out.path().join("master/00-master.yaml").is_file());
    assert!(out.path().join("infra/00-worker.yaml").is_file());
    assert!(out.path().join("infra/01-worker-kubelet.yaml").is_file());
    assert!(!out.path().join("worker").exists());

    let infra: MachineConfig =
        serde_yaml::from_str(&fs::read_to_string(out.path().join("infra/00-worker.yaml"))?)?;
    assert_eq!(infra.metadata.labels["machineconfiguration.openshift.io/role"], "infra");
    Ok(())
}

#[test]
fn test_templates_dir_from_settings() -> Result<()> {
    let home = TempDir::new()?;
    let tree = sample_tree()?;
    let cc = ControllerConfigFixture::platform("GCP").write_to(home.path())?;
    let settings = home.path().join("settings.toml");
    fs::write(&settings, format!("templates_dir = {:?}\n", tree.root().display().to_string()))?;

    mcrender(&home)
        .arg("--settings")
        .arg(&settings)
        .arg("render")
        .arg("-c")
        .arg(&cc)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: 00-worker"));
    Ok(())
}

#[test]
fn test_render_without_templates_fails() -> Result<()> {
    let home = TempDir::new()?;
    let cc = ControllerConfigFixture::platform("AWS").write_to(home.path())?;

    mcrender(&home)
        .arg("render")
        .arg("-c")
        .arg(&cc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no template repository given"));
    Ok(())
}

#[test]
fn test_render_error_reports_fragment() -> Result<()> {
    let home = TempDir::new()?;
    let tree = sample_tree()?;
    tree.file("worker/00-worker/_base/files/bad.yaml", "{{ urlPort(u=\"ftp://h\") }}")?;
    let cc = ControllerConfigFixture::platform("AWS").write_to(home.path())?;

    mcrender(&home)
        .arg("render")
        .arg("-t")
        .arg(tree.root())
        .arg("-c")
        .arg(&cc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("worker/00-worker/_base/files/bad.yaml"));
    Ok(())
}

#[test]
fn test_tiers_command() -> Result<()> {
    let home = TempDir::new()?;
    let cc = ControllerConfigFixture::single_node("BareMetal").write_to(home.path())?;

    mcrender(&home)
        .arg("tiers")
        .arg("-c")
        .arg(&cc)
        .assert()
        .success()
        .stdout(predicate::str::contains("baremetal"))
        .stdout(predicate::str::contains("_base, on-prem, baremetal, sno"));

    let output = mcrender(&home).arg("tiers").arg("--json").arg("-c").arg(&cc).output()?;
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["platform"], "baremetal");
    assert_eq!(report["single_node"], true);
    assert_eq!(report["tiers"], serde_json::json!(["_base", "on-prem", "baremetal", "sno"]));
    Ok(())
}

#[test]
fn test_tiers_without_platform_fails() -> Result<()> {
    let home = TempDir::new()?;
    let cc = home.path().join("cc.yaml");
    fs::write(&cc, "spec:\n  infra:\n    status: {}\n")?;

    mcrender(&home)
        .arg("tiers")
        .arg("-c")
        .arg(&cc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("platformStatus.type"));
    Ok(())
}
