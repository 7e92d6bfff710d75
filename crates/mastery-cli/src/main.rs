//! Mastery CLI
//!
//! Compile lesson markdown and inspect mastery-gated learning paths.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use mastery_cli::{Cli, Command, MasteryConfig, logging};
use mastery_core::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the file is missing or broken.
    let config = match cli.command {
        Command::Config { .. } => MasteryConfig::default(),
        _ => MasteryConfig::load(cli.config.as_deref()).context("loading configuration")?,
    };

    logging::init(&config.logging.level, cli.verbose);
    tracing::debug!(command = ?cli.command, "starting");

    let ok = mastery_cli::run(cli, &config).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
