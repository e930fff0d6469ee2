//! mcrender CLI entry point
//!
//! Parses arguments, installs logging, runs the command and prints any failure through
//! [`user_friendly_error`] before exiting non-zero.

use anyhow::Result;
use clap::Parser;
use mcrender::cli;
use mcrender::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
