//! Configuration generation from a template repository.
//!
//! The generator walks the repository root role by role, and each role's subtree name
//! by name, producing one [`MachineConfig`] per name:
//!
//! ```text
//! templates/
//! ├── common/_base/files/...          shared by every role (once per role)
//! ├── master/
//! │   ├── 00-master/_base/{files,units}/...
//! │   └── 01-master-kubelet/{_base,aws,sno}/...
//! └── worker/
//!     ├── 00-worker/...
//!     └── 01-worker-kubelet/...
//! ```
//!
//! Roles and names are processed in sorted order. The `common` subtree is merged into
//! exactly one name per role, the lexicographically first one, below that name's own
//! tiers. Custom roles (anything but `master` and `worker`) reuse the `worker` subtree.
//!
//! After building, every object gets the default OS image and the generator version
//! annotation; the kubelet configurations also get their kernel arguments normalized
//! (see [`kargs`]).

pub mod kargs;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::{GENERATED_BY_CONTROLLER_VERSION_ANNOTATION, VERSION};
use crate::core::Role;
use crate::machineconfig::{
    BaseImageSource, ConfigBuilder, IgnitionBuilder, MachineConfig, SpecBaseImage,
};
use crate::merge::{FragmentMerger, sorted_contents};
use crate::platform;
use crate::resolver::{COMMON_DIR, TierDirs, tiers_for};
use crate::templating::{RenderContext, TemplateRenderer};
use crate::utils::{read_dir_sorted, relative_display};

/// One-shot gate for the shared `common` templates of a role pass.
///
/// The first name to pass through takes the common templates; the gate then stays closed
/// for the rest of the role, whether or not any common tier directory existed.
#[derive(Debug, Default)]
pub struct CommonGate {
    added: bool,
}

impl CommonGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once, closing the gate
    pub fn take(&mut self) -> bool {
        !std::mem::replace(&mut self.added, true)
    }

    pub fn is_open(&self) -> bool {
        !self.added
    }
}

/// Generates configuration objects from one template repository and render context
pub struct Generator {
    root: PathBuf,
    renderer: TemplateRenderer,
    builder: Arc<dyn ConfigBuilder>,
    base_image: Arc<dyn BaseImageSource>,
}

impl Generator {
    /// Generator with the default Ignition builder and spec base image
    pub fn new(root: impl Into<PathBuf>, ctx: RenderContext) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            renderer: TemplateRenderer::new(ctx)?,
            builder: Arc::new(IgnitionBuilder),
            base_image: Arc::new(SpecBaseImage),
        })
    }

    #[must_use]
    pub fn with_builder(mut self, builder: Arc<dyn ConfigBuilder>) -> Self {
        self.builder = builder;
        self
    }

    #[must_use]
    pub fn with_base_image_source(mut self, base_image: Arc<dyn BaseImageSource>) -> Self {
        self.base_image = base_image;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Role directories at the repository root, sorted, without `common`
    pub fn roles(&self) -> Result<Vec<Role>> {
        let mut roles = Vec::new();
        for entry in read_dir_sorted(&self.root)? {
            if !entry.is_dir {
                info!("ignoring non-directory path {:?}", entry.name);
                continue;
            }
            if entry.name == COMMON_DIR {
                continue;
            }
            roles.push(Role::from(entry.name));
        }
        Ok(roles)
    }

    /// Generate every configuration object in the repository, in role then name order
    pub fn generate_all(&self) -> Result<Vec<MachineConfig>> {
        let mut configs = Vec::new();
        for role in self.roles()? {
            let role_configs = self
                .generate_for_role(&role)
                .with_context(|| format!("failed to create MachineConfig for role {role}"))?;
            configs.extend(role_configs);
        }
        Ok(configs)
    }

    /// Generate the configuration objects of one role
    pub fn generate_for_role(&self, role: &Role) -> Result<Vec<MachineConfig>> {
        let role_dir = self.root.join(role.template_dir());
        if role.is_custom() {
            debug!("Role {} uses the {} templates", role, role.template_dir());
        }

        let mut gate = CommonGate::new();
        let mut configs = Vec::new();
        for entry in read_dir_sorted(&role_dir)? {
            if !entry.is_dir {
                info!("ignoring non-directory path {:?}", entry.name);
                continue;
            }

            let mut mc = self.generate_for_name(role, &entry.name, &entry.path, &mut gate)?;
            kargs::normalize(&mut mc);
            mc.annotate(GENERATED_BY_CONTROLLER_VERSION_ANNOTATION, VERSION);
            configs.push(mc);
        }
        Ok(configs)
    }

    /// Generate the configuration object of one name directory.
    ///
    /// Takes the common templates if `gate` is still open.
    pub fn generate_for_name(
        &self,
        role: &Role,
        name: &str,
        name_dir: &Path,
        gate: &mut CommonGate,
    ) -> Result<MachineConfig> {
        let ctx = self.renderer.context();
        let classification = platform::classify(ctx.infra())?;
        let tiers = tiers_for(&classification);

        let mut dirs = Vec::new();
        if gate.take() {
            dirs.extend(TierDirs::common(&self.root, &tiers)?);
        }
        dirs.extend(TierDirs::for_name(name_dir, &tiers)?);

        debug!(
            "Generating {} for role {} from [{}]",
            name,
            role,
            dirs.iter().map(|d| relative_display(&self.root, d)).collect::<Vec<_>>().join(", ")
        );

        let fragments = FragmentMerger::new(&self.root, &self.renderer).merge(&dirs)?;
        if fragments.is_empty() {
            debug!("No fragments apply to {} for role {}", name, role);
        }
        let files = sorted_contents(&fragments.files);
        let units = sorted_contents(&fragments.units);

        let mut mc = self
            .builder
            .build(role, name, &files, &units)
            .context("error creating MachineConfig from fragments")?;
        mc.spec.os_image_url = self.base_image.default_base_image(&ctx.spec);

        Ok(mc)
    }
}

/// Generate every configuration object under `root` with the default collaborators
pub fn generate_template_machine_configs(
    ctx: RenderContext,
    root: &Path,
) -> Result<Vec<MachineConfig>> {
    Generator::new(root, ctx)?.generate_all()
}

/// Generate the configuration objects of one role with the default collaborators
pub fn generate_machine_configs_for_role(
    ctx: RenderContext,
    role: &Role,
    root: &Path,
) -> Result<Vec<MachineConfig>> {
    Generator::new(root, ctx)?.generate_for_role(role)
}
