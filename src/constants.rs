//! Names and values shared across the crate.
//!
//! Directory names of the template repository layout, well-known configuration names,
//! object annotation keys and the default constant table exposed to templates.

/// Area of a tier directory holding file fragments
pub const FILES_DIR: &str = "files";

/// Area of a tier directory holding systemd unit fragments
pub const UNITS_DIR: &str = "units";

/// Kubelet configuration of the master role; its kernel arguments are normalized
pub const BASE_MASTER_KUBELET_MC: &str = "01-master-kubelet";

/// Kubelet configuration of the worker role; its kernel arguments are normalized
pub const BASE_WORKER_KUBELET_MC: &str = "01-worker-kubelet";

/// Annotation recording which generator version produced an object
pub const GENERATED_BY_CONTROLLER_VERSION_ANNOTATION: &str =
    "machineconfiguration.openshift.io/generated-by-controller-version";

/// Annotation recording the fingerprint of the ordered fragment content
pub const CONTENT_FINGERPRINT_ANNOTATION: &str =
    "machineconfiguration.openshift.io/content-fingerprint";

/// Label carrying the role an object was generated for
pub const ROLE_LABEL: &str = "machineconfiguration.openshift.io/role";

/// Version stamped on every generated object
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Constants available to templates as `constants.<Name>` when none are configured
pub const DEFAULT_CONSTANTS: &[(&str, &str)] = &[
    ("MachineConfigDaemonForceFile", "/run/machine-config-daemon-force"),
    ("MachineConfigDaemonPostConfigAction", "machineconfiguration.openshift.io/post-config-action"),
    ("MachineConfigDaemonReloadCrioAction", "reload-crio"),
    ("EtcPivotFile", "/etc/pivot/image-pullspec"),
    ("KubeletAuthFile", "/var/lib/kubelet/config.json"),
    ("KubeletKubeconfigPath", "/etc/kubernetes/kubeconfig"),
    ("CloudConfigPath", "/etc/kubernetes/cloud.conf"),
    ("OpenShiftOnPremDir", "/etc/kubernetes/static-pod-resources"),
];

/// [`DEFAULT_CONSTANTS`] as an owned, ordered map
#[must_use]
pub fn default_constants() -> std::collections::BTreeMap<String, String> {
    DEFAULT_CONSTANTS.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}
