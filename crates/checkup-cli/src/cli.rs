use std::path::PathBuf;

use clap::Parser;

/// A CLI that provides health check information about your project
#[derive(Debug, Parser)]
#[command(name = "checkup", version)]
pub struct Cli {
    /// The path referring to the root directory that checkup will run in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Run a single registered task by name
    #[arg(short, long, value_name = "NAME")]
    pub task: Option<String>,

    /// Run tasks without printing any results
    #[arg(short, long)]
    pub silent: bool,

    /// Print one merged JSON report instead of console sections
    #[arg(long)]
    pub json: bool,

    /// Abort the whole run as soon as one task fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Exit with status 2 when any task reports a failure
    #[arg(long)]
    pub strict: bool,

    /// Log debug output to stderr
    #[arg(long)]
    pub verbose: bool,
}
