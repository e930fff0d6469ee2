//! Command-line interface for mcrender.
//!
//! # Commands
//!
//! - `render` - Render every role's configuration objects from a template repository
//! - `tiers` - Show how a controller config classifies and which tiers apply
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only log errors
//! - `--settings` - Path to an engine settings file (see [`crate::config::Settings`])
//!
//! `RUST_LOG`, when set, takes precedence over both verbosity flags.
//!
//! # Example
//!
//! ```bash
//! # Render to stdout as a multi-document YAML stream
//! mcrender render --templates ./templates --controller-config ./cc.yaml
//!
//! # Write one JSON file per object
//! mcrender render -t ./templates -c ./cc.yaml --output ./out --format json
//!
//! # Which tier directories would be consulted?
//! mcrender tiers -c ./cc.yaml
//! ```

mod render;
mod tiers;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

pub use render::{OutputFormat, RenderCommand};
pub use tiers::TiersCommand;

/// Options shared by every command, resolved from the global flags
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,

    /// Explicit settings file
    pub settings_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(&self.log_level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load engine settings from the explicit path, the environment or the default path
    pub async fn settings(&self) -> Result<Settings> {
        Settings::load(self.settings_path.as_deref()).await
    }
}

#[derive(Parser)]
#[command(
    name = "mcrender",
    about = "Render layered boot-configuration templates into machine configs",
    version,
    long_about = "mcrender resolves a template repository into one machine config per \
                  role and name, layering base, on-prem, platform and single-node tiers."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the engine settings file
    #[arg(short, long, global = true, env = "MCRENDER_CONFIG")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render configuration objects from a template repository
    Render(RenderCommand),

    /// Print the platform classification and tier list of a controller config
    Tiers(TiersCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            settings_path: self.settings.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(&config).await,
            Commands::Tiers(cmd) => cmd.execute().await,
        }
    }
}
