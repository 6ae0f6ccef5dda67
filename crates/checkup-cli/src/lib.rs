pub mod cli;
pub mod tasks;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use checkup_core::config::load_config;
use checkup_core::project::{read_package_json, resolve_project_root};
use checkup_core::result::{OutputMode, render_results};
use checkup_core::{ExecutionPolicy, PluginCatalog, PluginLoader, RunArgs, TaskList, select_tasks};
use checkup_plugin_ember::EmberPlugin;
use colored::Colorize;

use crate::cli::Cli;
use crate::tasks::BuiltinTasksPlugin;

pub const STATUS_MESSAGE: &str = "Checking up on your project";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunOptions {
    pub path: PathBuf,
    pub task: Option<String>,
    pub mode: OutputMode,
    pub policy: ExecutionPolicy,
}

impl RunOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            task: None,
            mode: OutputMode::Console,
            policy: ExecutionPolicy::FailSoft,
        }
    }
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            path: cli.path.clone(),
            task: cli.task.clone(),
            mode: OutputMode::from_flags(cli.json, cli.silent),
            policy: if cli.fail_fast {
                ExecutionPolicy::FailFast
            } else {
                ExecutionPolicy::FailSoft
            },
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunOutcome {
    pub tasks_run: usize,
    pub failed_tasks: Vec<String>,
}

impl RunOutcome {
    pub fn exit_status(&self, strict: bool) -> u8 {
        if strict && !self.failed_tasks.is_empty() {
            2
        } else {
            0
        }
    }

    pub fn exit_code(&self, strict: bool) -> ExitCode {
        ExitCode::from(self.exit_status(strict))
    }
}

/// Plugins this binary can resolve, plus the always-on builtin tasks.
pub fn plugin_loader() -> PluginLoader {
    PluginLoader::new(PluginCatalog::new().with(Arc::new(EmberPlugin)))
        .with_builtin(Arc::new(BuiltinTasksPlugin))
}

/// One full checkup: config, plugins, project check, hooks, tasks, output.
pub async fn run(
    options: &RunOptions,
    loader: &PluginLoader,
    out: &mut dyn Write,
    status: &mut dyn Write,
) -> Result<RunOutcome> {
    let config = load_config(&options.path)?;
    let plugins = loader.load(&config.plugin_ids(), &options.path)?;
    tracing::debug!(plugins = ?plugins.ids(), "plugins loaded");

    read_package_json(&options.path)?;

    let registries = plugins.register_all()?;
    let constructors = select_tasks(&registries.tasks, options.task.as_deref())?;
    if constructors.is_empty() {
        tracing::warn!("no tasks are registered; check the plugins listed in .checkuprc");
    }

    let args = Arc::new(RunArgs::new(resolve_project_root(&options.path)));
    let mut list = TaskList::with_policy(options.policy);
    list.add_tasks(constructors, args);

    if options.mode == OutputMode::Console {
        writeln!(status, "{}", format!("{STATUS_MESSAGE}...").dimmed())
            .context("failed to write status")?;
    }

    let results = list.run_tasks().await?;
    render_results(&results, options.mode, out).context("failed to write report")?;

    let failed_tasks: Vec<String> = results
        .iter()
        .filter(|result| result.is_error())
        .flat_map(|result| result.to_json().into_iter().map(|(name, _)| name))
        .collect();
    if !failed_tasks.is_empty() {
        tracing::warn!(failed = ?failed_tasks, "some tasks failed");
    }

    Ok(RunOutcome {
        tasks_run: results.len(),
        failed_tasks,
    })
}
