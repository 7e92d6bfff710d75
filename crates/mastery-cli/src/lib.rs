//! # mastery-cli
//!
//! Command-line interface for Mastery.
//!
//! This crate provides:
//! - Lesson markdown import, validation, and export
//! - Learning path, next-content, and recommendation queries over a
//!   curriculum snapshot and a learner's progress
//! - Dependency graph inspection
//! - Configuration file management

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod files;
pub mod logging;

pub use cli::{Cli, Command};
pub use commands::CommandOutput;
pub use config::MasteryConfig;

use mastery_core::Result;

/// Run a parsed command line.
///
/// Returns `Ok(false)` when the command completed but found problems
/// (failed imports, invalid lessons, prerequisite cycles).
pub async fn run(cli: Cli, config: &MasteryConfig) -> Result<bool> {
    let output = match cli.command {
        Command::Import(args) => commands::cmd_import(&args, config).await?,
        Command::Validate(args) => commands::cmd_validate(&args, config).await?,
        Command::Export(args) => commands::cmd_export(&args, config).await?,
        Command::Path(args) => commands::cmd_path(&args, config).await?,
        Command::Next(args) => commands::cmd_next(&args, config).await?,
        Command::Recommend(args) => commands::cmd_recommend(&args, config).await?,
        Command::Progress(args) => commands::cmd_progress(&args, config).await?,
        Command::Graph(args) => commands::cmd_graph(&args, config).await?,
        Command::Config { action } => {
            config_handlers::handle_config_command(cli.config.as_deref(), action)?;
            return Ok(true);
        }
    };

    print!("{}", output.text);
    if !output.text.is_empty() && !output.text.ends_with('\n') {
        println!();
    }
    Ok(output.success)
}
