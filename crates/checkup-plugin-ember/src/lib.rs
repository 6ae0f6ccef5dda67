//! Ember project checks for checkup.
//!
//! Contributes a `json` parser during `register-parsers` and the
//! `dependencies` task during `register-tasks`.

pub mod dependencies;

use std::sync::Arc;

use checkup_core::models::{CoreError, CoreErrorKind, CoreResult};
use checkup_core::{JsonParser, Plugin, RegisterParsersContext, RegisterTasksContext};

pub use dependencies::{DependenciesTask, DependenciesTaskResult, DependencyGroups};

pub const PLUGIN_ID: &str = "checkup-plugin-ember";
pub const JSON_PARSER: &str = "json";

#[derive(Clone, Copy, Debug, Default)]
pub struct EmberPlugin;

impl Plugin for EmberPlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn register_parsers(&self, ctx: &mut RegisterParsersContext<'_>) -> CoreResult<()> {
        ctx.register_parser(JSON_PARSER, Arc::new(JsonParser));
        Ok(())
    }

    fn register_tasks(&self, ctx: &mut RegisterTasksContext<'_>) -> CoreResult<()> {
        let parser = ctx.parsers().get(JSON_PARSER).cloned().ok_or_else(|| {
            CoreError::new(
                CoreErrorKind::Internal,
                format!("no '{JSON_PARSER}' parser is registered"),
            )
        })?;

        ctx.register_task(
            dependencies::DESCRIPTOR.name,
            DependenciesTask::constructor(parser),
        );
        Ok(())
    }
}
