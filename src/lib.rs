//! mcrender - layered boot-configuration template renderer
//!
//! mcrender turns a template repository plus a cluster's controller config into one
//! machine configuration object per (role, name). Templates are organized in override
//! tiers so that a platform, an on-prem family or a single-node topology can replace,
//! add or remove individual fragments without copying the whole tree.
//!
//! # Architecture Overview
//!
//! A render walks the pipeline below once per role:
//!
//! 1. [`platform`] classifies the infrastructure status into a platform identifier and
//!    the on-prem / single-node flags.
//! 2. [`resolver`] turns the classification into an ordered list of tiers and finds the
//!    tier directories that exist for a name (and, once per role, for `common`).
//! 3. [`merge`] walks the `files` and `units` areas of each tier, renders every fragment
//!    through [`templating`] and merges by file name, with tombstones and
//!    conditional-empty handling.
//! 4. [`machineconfig`] builds the configuration object from the sorted fragments.
//! 5. [`generator`] drives the walk, applies the default OS image, kernel argument
//!    normalization and the version annotation.
//!
//! # Template Repository
//!
//! ```text
//! templates/
//! ├── common/<tier>/{files,units}/...
//! └── <role>/<name>/<tier>/{files,units}/...
//! ```
//!
//! Tiers, lowest precedence first: `_base`, `on-prem` (on-prem platforms only),
//! `<platform>` (e.g. `aws`, `baremetal`, `none`), `sno` (single-replica control plane).
//!
//! # Example
//!
//! ```rust,no_run
//! use mcrender::config::ControllerConfigSpec;
//! use mcrender::generator::generate_template_machine_configs;
//! use mcrender::platform::FeatureGates;
//! use mcrender::templating::RenderContext;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let spec = ControllerConfigSpec::from_yaml(&std::fs::read_to_string("cc.yaml")?)?;
//! let ctx = RenderContext::new(spec, Arc::new(FeatureGates::default()));
//! for mc in generate_template_machine_configs(ctx, Path::new("templates"))? {
//!     println!("{}", mc.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Engine settings and the controller config document
//! - [`constants`] - Shared names, annotation keys and template constants
//! - [`core`] - Error types and node roles
//! - [`utils`] - Filesystem helpers

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod generator;
pub mod machineconfig;
pub mod merge;
pub mod platform;
pub mod resolver;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
