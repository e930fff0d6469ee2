//! Kernel argument normalization for kubelet configurations.
//!
//! The kubelet configurations default nodes to cgroups v1: any v2 arguments are dropped
//! and the v1 arguments appended when missing.

use crate::constants::{BASE_MASTER_KUBELET_MC, BASE_WORKER_KUBELET_MC};
use crate::machineconfig::MachineConfig;

const CGROUPS_V1_ARGS: [&str; 2] =
    ["systemd.unified_cgroup_hierarchy=0", "systemd.legacy_systemd_cgroup_controller=1"];

const CGROUPS_V2_ARGS: [&str; 3] =
    ["systemd.unified_cgroup_hierarchy=1", "cgroup_no_v1=\"all\"", "psi=1"];

/// Whether the named configuration gets its kernel arguments normalized
#[must_use]
pub fn is_kubelet_config(name: &str) -> bool {
    name == BASE_MASTER_KUBELET_MC || name == BASE_WORKER_KUBELET_MC
}

/// Drop cgroups v2 arguments and append the v1 ones that are missing, keeping order
pub fn default_cgroups_v1(kernel_arguments: &mut Vec<String>) {
    kernel_arguments.retain(|arg| !CGROUPS_V2_ARGS.contains(&arg.as_str()));
    for arg in CGROUPS_V1_ARGS {
        if !kernel_arguments.iter().any(|a| a == arg) {
            kernel_arguments.push(arg.to_string());
        }
    }
}

/// Apply [`default_cgroups_v1`] when `mc` is one of the kubelet configurations
pub fn normalize(mc: &mut MachineConfig) {
    if is_kubelet_config(mc.name()) {
        default_cgroups_v1(&mut mc.spec.kernel_arguments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_default_from_empty() {
        let mut kargs = Vec::new();
        default_cgroups_v1(&mut kargs);
        assert_eq!(kargs, args(&CGROUPS_V1_ARGS));
    }

    #[test]
    fn test_v2_args_removed_others_kept() {
        let mut kargs = args(&[
            "systemd.unified_cgroup_hierarchy=1",
            "nosmt",
            "cgroup_no_v1=\"all\"",
            "psi=1",
            "systemd.legacy_systemd_cgroup_controller=1",
        ]);
        default_cgroups_v1(&mut kargs);
        assert_eq!(
            kargs,
            args(&[
                "nosmt",
                "systemd.legacy_systemd_cgroup_controller=1",
                "systemd.unified_cgroup_hierarchy=0",
            ])
        );
    }

    #[test]
    fn test_idempotent() {
        let mut kargs = args(&["quiet"]);
        default_cgroups_v1(&mut kargs);
        let once = kargs.clone();
        default_cgroups_v1(&mut kargs);
        assert_eq!(kargs, once);
    }

    #[test]
    fn test_normalize_only_kubelet_configs() {
        let mut kubelet = MachineConfig::new("01-worker-kubelet");
        normalize(&mut kubelet);
        assert_eq!(kubelet.spec.kernel_arguments.len(), 2);

        let mut other = MachineConfig::new("00-worker");
        normalize(&mut other);
        assert!(other.spec.kernel_arguments.is_empty());

        assert!(is_kubelet_config("01-master-kubelet"));
        assert!(!is_kubelet_config("01-infra-kubelet"));
    }
}
