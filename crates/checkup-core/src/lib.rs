pub mod config;
pub mod logging;
pub mod models;
pub mod parser;
pub mod plugin;
pub mod project;
pub mod registry;
pub mod result;
pub mod task;
pub mod task_list;

pub use models::{CoreError, CoreErrorKind, CoreResult, RunArgs, TaskDescriptor};
pub use parser::{JsonParser, Parser};
pub use plugin::{
    Hook, LoadedPlugins, Plugin, PluginCatalog, PluginLoader, RegisterParsersContext,
    RegisterTasksContext,
};
pub use registry::{FrozenRegistries, ParserRegistry, Registries, Registry, TaskRegistry};
pub use result::{JsonRecord, OutputMode, TaskErrorResult, TaskResult};
pub use task::{NamedTask, Task, TaskConstructor, TaskFuture};
pub use task_list::{ExecutionPolicy, TaskList, select_tasks};
