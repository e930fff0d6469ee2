//! Turning sorted fragments into a configuration object.

use std::collections::BTreeSet;

use super::MachineConfig;
use super::ignition::{self, FileFragment, IgnitionConfig, UnitFragment};
use crate::constants::{CONTENT_FINGERPRINT_ANNOTATION, ROLE_LABEL};
use crate::core::{RenderError, Role};
use crate::merge::content_fingerprint;

/// Builds the configuration object for one (role, name) from its ordered fragments.
///
/// `files` and `units` arrive sorted by fragment name; implementations must not reorder
/// them in a way that depends on anything else.
pub trait ConfigBuilder: Send + Sync {
    fn build(
        &self,
        role: &Role,
        name: &str,
        files: &[String],
        units: &[String],
    ) -> Result<MachineConfig, RenderError>;
}

/// Default builder producing an Ignition 3 config
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnitionBuilder;

impl IgnitionBuilder {
    fn transpile(
        &self,
        name: &str,
        files: &[String],
        units: &[String],
    ) -> Result<IgnitionConfig, RenderError> {
        let err = |reason: String| RenderError::TranspileError {
            name: name.to_string(),
            reason,
        };

        let mut config = IgnitionConfig::default();

        let mut paths = BTreeSet::new();
        for content in files {
            let frag: FileFragment = serde_yaml::from_str(content)
                .map_err(|e| err(format!("invalid file fragment: {e}")))?;
            if !frag.path.starts_with('/') {
                return Err(err(format!("file path {:?} is not absolute", frag.path)));
            }
            if !paths.insert(frag.path.clone()) {
                return Err(err(format!("duplicate file path {}", frag.path)));
            }

            let source = match (frag.contents.inline, frag.contents.source) {
                (Some(_), Some(_)) => {
                    return Err(err(format!(
                        "file {} sets both contents.inline and contents.source",
                        frag.path
                    )));
                }
                (Some(inline), None) => Some(ignition::data_url(&inline)),
                (None, source) => source,
            };

            config.storage.files.push(ignition::File {
                path: frag.path,
                mode: frag.mode,
                overwrite: frag.overwrite,
                contents: ignition::FileContents {
                    source,
                },
            });
        }

        let mut names = BTreeSet::new();
        for content in units {
            let unit: UnitFragment = serde_yaml::from_str(content)
                .map_err(|e| err(format!("invalid unit fragment: {e}")))?;
            if unit.name.is_empty() {
                return Err(err("unit fragment without a name".to_string()));
            }
            if !names.insert(unit.name.clone()) {
                return Err(err(format!("duplicate unit {}", unit.name)));
            }
            config.systemd.units.push(unit);
        }

        Ok(config)
    }
}

impl ConfigBuilder for IgnitionBuilder {
    fn build(
        &self,
        role: &Role,
        name: &str,
        files: &[String],
        units: &[String],
    ) -> Result<MachineConfig, RenderError> {
        let config = self.transpile(name, files, units)?;

        let mut mc = MachineConfig::new(name);
        mc.label(ROLE_LABEL, role.as_str());
        mc.annotate(CONTENT_FINGERPRINT_ANNOTATION, content_fingerprint(files, units));
        mc.spec.config = config;
        Ok(mc)
    }
}
