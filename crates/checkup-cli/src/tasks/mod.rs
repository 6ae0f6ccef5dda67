pub mod project;

use checkup_core::models::CoreResult;
use checkup_core::task::{NamedTask, TaskConstructor};
use checkup_core::{Plugin, RegisterTasksContext};

pub use project::{ProjectInfoResult, ProjectInfoTask};

pub const BUILTIN_PLUGIN_ID: &str = "checkup-core-tasks";

/// Tasks that ship with the CLI and load whatever the project config says.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinTasksPlugin;

impl Plugin for BuiltinTasksPlugin {
    fn id(&self) -> &str {
        BUILTIN_PLUGIN_ID
    }

    fn register_tasks(&self, ctx: &mut RegisterTasksContext<'_>) -> CoreResult<()> {
        ctx.register_task(
            ProjectInfoTask::DESCRIPTOR.name,
            TaskConstructor::of::<ProjectInfoTask>(),
        );
        Ok(())
    }
}
