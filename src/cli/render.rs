//! Render configuration objects from a template repository.
//!
//! Roles are rendered concurrently, each on a blocking task with its own copy of the
//! render context; results are emitted in sorted role order regardless of which task
//! finishes first.
//!
//! # Output
//!
//! Without `--output` every object is written to stdout, as a multi-document YAML stream
//! or a JSON array. With `--output DIR` each object goes to `DIR/<role>/<name>.<ext>`,
//! since custom roles reuse the `worker` names.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::CliConfig;
use crate::config::{ControllerConfigSpec, Settings};
use crate::core::{RenderError, Role};
use crate::generator::Generator;
use crate::machineconfig::MachineConfig;
use crate::templating::RenderContext;
use crate::utils::exists_dir;
use crate::utils::fs::atomic_write_multiple;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// YAML documents separated by `---`
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    fn serialize_one(self, mc: &MachineConfig) -> Result<String> {
        match self {
            Self::Yaml => serde_yaml::to_string(mc).context("Failed to serialize to YAML"),
            Self::Json => {
                let mut json =
                    serde_json::to_string_pretty(mc).context("Failed to serialize to JSON")?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    fn serialize_all(self, configs: &[MachineConfig]) -> Result<String> {
        match self {
            Self::Yaml => {
                let mut out = String::new();
                for mc in configs {
                    out.push_str("---\n");
                    out.push_str(&self.serialize_one(mc)?);
                }
                Ok(out)
            }
            Self::Json => {
                let mut json =
                    serde_json::to_string_pretty(configs).context("Failed to serialize to JSON")?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template repository root (defaults to `templates_dir` from the settings)
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Controller config document (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub controller_config: PathBuf,

    /// Write one file per object under this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,

    /// Render only these roles; a role without its own subtree uses `worker` templates
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,
}

impl RenderCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = config.settings().await?;
        let templates = self.templates_dir(&settings)?;
        let ctx = build_context(&self.controller_config, &settings).await?;

        let roles: Vec<Role> = if self.roles.is_empty() {
            Generator::new(&templates, ctx.clone())?.roles()?
        } else {
            let mut roles: Vec<Role> = self.roles.iter().map(|r| Role::from(r.clone())).collect();
            roles.sort();
            roles.dedup();
            roles
        };
        debug!("Rendering roles: {:?}", roles.iter().map(Role::as_str).collect::<Vec<_>>());

        let rendered = render_roles(&templates, &ctx, roles).await?;
        let total: usize = rendered.iter().map(|(_, configs)| configs.len()).sum();
        info!("Rendered {} machine configs from {}", total, templates.display());

        match &self.output {
            Some(dir) => {
                let files = rendered
                    .iter()
                    .flat_map(|(role, configs)| configs.iter().map(move |mc| (role, mc)))
                    .map(|(role, mc)| {
                        let path = dir
                            .join(role.as_str())
                            .join(format!("{}.{}", mc.name(), self.format.extension()));
                        Ok((path, self.format.serialize_one(mc)?.into_bytes()))
                    })
                    .collect::<Result<Vec<_>>>()?;

                atomic_write_multiple(files).await?;
                println!(
                    "{} Wrote {} machine configs to {}",
                    "✓".green(),
                    total,
                    dir.display()
                );
            }
            None => {
                let configs: Vec<MachineConfig> =
                    rendered.into_iter().flat_map(|(_, configs)| configs).collect();
                print!("{}", self.format.serialize_all(&configs)?);
            }
        }

        Ok(())
    }

    fn templates_dir(&self, settings: &Settings) -> Result<PathBuf> {
        let templates = self.templates.clone().or_else(|| settings.templates_dir.clone()).ok_or_else(
            || RenderError::ConfigError {
                message: "no template repository given; pass --templates or set templates_dir \
                          in the settings file"
                    .to_string(),
            },
        )?;

        if !exists_dir(&templates)? {
            return Err(RenderError::FileSystemError {
                operation: "open template repository".to_string(),
                path: templates.display().to_string(),
            }
            .into());
        }
        Ok(templates)
    }
}

/// Build the render context from a controller config file and engine settings
pub(crate) async fn build_context(
    controller_config: &Path,
    settings: &Settings,
) -> Result<RenderContext> {
    let spec = ControllerConfigSpec::load(controller_config).await?;
    let pull_secret = settings.pull_secret().await?;

    Ok(RenderContext::new(spec, Arc::new(settings.feature_gates()))
        .with_pull_secret(pull_secret)
        .with_constants(settings.constants()))
}

/// Render each role on its own blocking task, returning results in `roles` order
async fn render_roles(
    templates: &Path,
    ctx: &RenderContext,
    roles: Vec<Role>,
) -> Result<Vec<(Role, Vec<MachineConfig>)>> {
    let tasks = roles.into_iter().map(|role| {
        let root = templates.to_path_buf();
        let ctx = ctx.clone();
        tokio::task::spawn_blocking(move || {
            let configs = Generator::new(root, ctx)?
                .generate_for_role(&role)
                .with_context(|| format!("failed to create MachineConfig for role {role}"))?;
            Ok::<_, anyhow::Error>((role, configs))
        })
    });

    let results = try_join_all(tasks).await.context("Render task failed")?;
    results.into_iter().collect()
}
