//! Configuration inputs
//!
//! - [`settings`] - engine settings from `~/.mcrender/config.toml` (TOML)
//! - [`controller`] - the controller config document describing one cluster (YAML or JSON)

pub mod controller;
mod settings;

pub use controller::{ControllerConfigSpec, ProxyStatus};
pub use settings::{CONFIG_ENV_VAR, FeatureGateSettings, Settings};
