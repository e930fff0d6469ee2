//! Show the classification of a controller config and the tiers it selects.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::ControllerConfigSpec;
use crate::platform::{self, Classification};
use crate::resolver::{Tier, tiers_for};

#[derive(Args, Debug)]
pub struct TiersCommand {
    /// Controller config document (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub controller_config: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TiersReport {
    #[serde(flatten)]
    classification: Classification,
    tiers: Vec<Tier>,
}

impl TiersCommand {
    pub async fn execute(self) -> Result<()> {
        let spec = ControllerConfigSpec::load(&self.controller_config).await?;
        let classification = platform::classify(spec.infra_status())?;
        let tiers = tiers_for(&classification);

        if self.json {
            let report = TiersReport {
                classification,
                tiers,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize tiers")?
            );
            return Ok(());
        }

        println!("{} {}", "platform:".bold(), classification.platform);
        println!("{} {}", "on-prem:".bold(), classification.on_prem);
        println!("{} {}", "single-node:".bold(), classification.single_node);
        println!(
            "{} {}",
            "tiers:".bold(),
            tiers.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );
        Ok(())
    }
}
