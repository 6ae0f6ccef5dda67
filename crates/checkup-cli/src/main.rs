use std::io;
use std::process::ExitCode;

use anyhow::Result;
use checkup_cli::cli::Cli;
use checkup_cli::{RunOptions, plugin_loader, run};
use checkup_core::logging;
use clap::Parser as _;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "debug" } else { "warn" });

    let options = RunOptions::from(&cli);
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();
    let outcome = run(&options, &plugin_loader(), &mut stdout, &mut stderr).await?;

    Ok(outcome.exit_code(cli.strict))
}
