use std::io::{self, Write};
use std::sync::Arc;

use checkup_core::models::{CoreError, CoreErrorKind, RunArgs, TaskDescriptor};
use checkup_core::project::PackageJson;
use checkup_core::result::{JsonRecord, TaskResult, keyed_record, write_entries, write_section};
use checkup_core::task::{NamedTask, Task, TaskFuture};
use serde_json::json;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectInfoResult {
    pub name: Option<String>,
    pub version: Option<String>,
    pub dependency_count: usize,
    pub dev_dependency_count: usize,
}

impl TaskResult for ProjectInfoResult {
    fn to_json(&self) -> JsonRecord {
        keyed_record(
            ProjectInfoTask::DESCRIPTOR.name,
            json!({
                "name": self.name,
                "version": self.version,
                "dependencyCount": self.dependency_count,
                "devDependencyCount": self.dev_dependency_count,
            }),
        )
    }

    fn to_console(&self, out: &mut dyn Write) -> io::Result<()> {
        write_section(out, ProjectInfoTask::DESCRIPTOR.friendly_name)?;
        let dependencies = self.dependency_count.to_string();
        let dev_dependencies = self.dev_dependency_count.to_string();
        write_entries(
            out,
            [
                ("Name", self.name.as_deref().unwrap_or("(unnamed)")),
                ("Version", self.version.as_deref().unwrap_or("(none)")),
                ("Dependencies", dependencies.as_str()),
                ("Dev dependencies", dev_dependencies.as_str()),
            ],
        )
    }
}

pub struct ProjectInfoTask {
    args: Arc<RunArgs>,
}

impl NamedTask for ProjectInfoTask {
    const DESCRIPTOR: TaskDescriptor = TaskDescriptor::new("project", "Project Information");

    fn from_args(args: Arc<RunArgs>) -> Self {
        Self { args }
    }
}

impl Task for ProjectInfoTask {
    fn run(self: Box<Self>) -> TaskFuture {
        Box::pin(async move {
            let path = self.args.package_json_path();
            let source = tokio::fs::read_to_string(&path).await.map_err(|error| {
                CoreError::new(
                    CoreErrorKind::TaskFailure,
                    format!("failed to read {}: {error}", path.display()),
                )
                .with_path(&path)
            })?;
            let package: PackageJson = serde_json::from_str(&source).map_err(|error| {
                CoreError::new(CoreErrorKind::ParseFailure, format!("invalid JSON: {error}"))
                    .with_path(&path)
            })?;

            Ok(Box::new(ProjectInfoResult {
                name: package.name,
                version: package.version,
                dependency_count: package.dependencies.len(),
                dev_dependency_count: package.dev_dependencies.len(),
            }) as Box<dyn TaskResult>)
        })
    }
}
