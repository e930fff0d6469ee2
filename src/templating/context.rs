//! Render context: the values a fragment is rendered against.

use anyhow::{Context, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tera::Context as TeraContext;

use crate::config::ControllerConfigSpec;
use crate::constants::default_constants;
use crate::platform::{FeatureGateAccess, InfrastructureStatus};

/// Immutable snapshot of everything a render needs.
///
/// The feature-gate accessor is a required constructor argument, so every template
/// function that asks about cloud providers has something to ask.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub spec: ControllerConfigSpec,
    pub pull_secret: String,
    pub feature_gates: Arc<dyn FeatureGateAccess>,
    /// Template constants; [`crate::constants::DEFAULT_CONSTANTS`] when `None`
    pub constants: Option<BTreeMap<String, String>>,
}

/// What templates see at the top level
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateView<'a> {
    #[serde(flatten)]
    spec: &'a ControllerConfigSpec,
    pull_secret: &'a str,
    constants: Cow<'a, BTreeMap<String, String>>,
}

impl RenderContext {
    pub fn new(spec: ControllerConfigSpec, feature_gates: Arc<dyn FeatureGateAccess>) -> Self {
        Self {
            spec,
            pull_secret: String::new(),
            feature_gates,
            constants: None,
        }
    }

    #[must_use]
    pub fn with_pull_secret(mut self, pull_secret: impl Into<String>) -> Self {
        self.pull_secret = pull_secret.into();
        self
    }

    #[must_use]
    pub fn with_constants(mut self, constants: Option<BTreeMap<String, String>>) -> Self {
        self.constants = constants;
        self
    }

    #[must_use]
    pub fn infra(&self) -> &InfrastructureStatus {
        self.spec.infra_status()
    }

    #[must_use]
    pub fn gates(&self) -> &dyn FeatureGateAccess {
        self.feature_gates.as_ref()
    }

    /// Effective constants, falling back to the defaults
    #[must_use]
    pub fn constants(&self) -> Cow<'_, BTreeMap<String, String>> {
        match &self.constants {
            Some(constants) => Cow::Borrowed(constants),
            None => Cow::Owned(default_constants()),
        }
    }

    /// Tera context: the controller config fields at the top level plus `pullSecret` and `constants`
    pub fn to_tera_context(&self) -> Result<TeraContext> {
        let view = TemplateView {
            spec: &self.spec,
            pull_secret: &self.pull_secret,
            constants: self.constants(),
        };
        TeraContext::from_serialize(&view).context("Failed to build template context")
    }
}
