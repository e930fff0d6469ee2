//! Fragment templating with Tera.
//!
//! Every fragment in the template repository is a Tera template. Fragments are rendered
//! against the controller config spec, with its wire-format (camelCase) field names at
//! the top level:
//!
//! - `infra.status.platformStatus.type`, `infra.status.controlPlaneTopology`, ...
//! - `images.<name>`, `clusterDNSIP`, `cloudProviderConfig`, ...
//! - `pullSecret`: the configured pull secret
//! - `constants.<Name>`: well-known paths and names (see [`crate::constants`])
//!
//! Autoescaping is disabled; fragments are YAML, unit files and scripts, not HTML.
//!
//! # Functions
//!
//! See [`functions`] for the registered function library (`skip`, `cloudProvider`,
//! `urlHost`, the on-prem VIP accessors, ...).
//!
//! # Errors
//!
//! Failures surface as [`TemplateError`], naming the fragment by its path relative to the
//! repository root and, for syntax errors, the offending line.

mod context;
pub mod error;
pub mod functions;
mod renderer;


pub use context::RenderContext;
pub use error::{ErrorLocation, TemplateError};
pub use renderer::TemplateRenderer;
