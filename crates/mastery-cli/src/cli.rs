//! Command-line argument definitions.

use clap::{ArgAction, Args, Parser, Subcommand};
use mastery_content::ExportFormat;
use std::path::PathBuf;

/// Compile lesson markdown and inspect mastery-gated learning paths
#[derive(Parser, Debug)]
#[command(name = "mastery", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import lesson markdown files or directories and report diagnostics
    Import(ImportArgs),

    /// Import one lesson and run the structural validator over it
    Validate(ValidateArgs),

    /// Render a lesson (JSON or markdown input) as canonical markdown or JSON
    Export(ExportArgs),

    /// Print the learning path for one unit or the whole curriculum
    Path(PathArgs),

    /// Print the content a learner can work on now
    Next(LearnerArgs),

    /// Print remediation, enrichment, and next-content recommendations
    Recommend(LearnerArgs),

    /// Print a progress summary across the curriculum
    Progress(LearnerArgs),

    /// Print the content dependency graph and any dangling references
    Graph(GraphArgs),

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Markdown files or directories (searched recursively for *.md)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the full batch report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Lesson markdown file
    pub file: PathBuf,

    /// Print findings as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Lesson file: JSON lesson data, or markdown to re-render
    pub input: PathBuf,

    /// Output format (markdown or json); defaults to the configured format
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<ExportFormat>,

    /// Omit the frontmatter block
    #[arg(long)]
    pub no_metadata: bool,

    /// Omit exercises
    #[arg(long)]
    pub no_exercises: bool,

    /// Omit assessments
    #[arg(long)]
    pub no_assessments: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A curriculum snapshot plus one learner's progress.
#[derive(Args, Debug)]
pub struct LearnerArgs {
    /// Curriculum JSON file
    #[arg(long)]
    pub curriculum: PathBuf,

    /// Learner progress JSON file (omit for a learner with no progress)
    #[arg(long)]
    pub progress: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `path`.
#[derive(Args, Debug)]
pub struct PathArgs {
    #[command(flatten)]
    pub learner: LearnerArgs,

    /// Limit the path to one unit
    #[arg(long)]
    pub unit: Option<String>,
}

/// Arguments for `graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Curriculum JSON file
    #[arg(long)]
    pub curriculum: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `import.fail_on_warnings`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Write a default config file
    Init {
        /// Target file (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_label(s).ok_or_else(|| format!("unknown format '{s}' (expected markdown or json)"))
}
