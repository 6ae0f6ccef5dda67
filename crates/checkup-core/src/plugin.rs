use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

use crate::models::{CoreError, CoreErrorKind, CoreResult};
use crate::parser::Parser;
use crate::registry::{FrozenRegistries, ParserRegistry, Registries, TaskRegistry};
use crate::task::TaskConstructor;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Hook {
    RegisterParsers,
    RegisterTasks,
}

impl Hook {
    pub const ORDER: [Hook; 2] = [Hook::RegisterParsers, Hook::RegisterTasks];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegisterParsers => "register-parsers",
            Self::RegisterTasks => "register-tasks",
        }
    }
}

impl Display for Hook {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability handed to `register-parsers` hooks.
pub struct RegisterParsersContext<'a> {
    parsers: &'a mut ParserRegistry,
}

impl RegisterParsersContext<'_> {
    pub fn register_parser(&mut self, name: impl Into<String>, parser: Arc<dyn Parser>) {
        self.parsers.register(name, parser);
    }
}

/// Capability handed to `register-tasks` hooks: read-only parsers plus task registration.
pub struct RegisterTasksContext<'a> {
    parsers: &'a ParserRegistry,
    tasks: &'a mut TaskRegistry,
}

impl RegisterTasksContext<'_> {
    pub fn parsers(&self) -> &ParserRegistry {
        self.parsers
    }

    pub fn register_task(&mut self, name: impl Into<String>, constructor: TaskConstructor) {
        let name = name.into();
        let descriptor = constructor.descriptor();
        if descriptor.name != name {
            tracing::warn!(
                name = %name,
                descriptor = descriptor.name,
                "task registered under a name that differs from its descriptor"
            );
        }
        if !descriptor.has_valid_name() {
            tracing::warn!(task = descriptor.name, "task name is not lowercase kebab-case");
        }
        self.tasks.register(name, constructor);
    }
}

/// A statically linked contributor of parsers and tasks.
pub trait Plugin: Send + Sync {
    fn id(&self) -> &str;

    fn register_parsers(&self, _ctx: &mut RegisterParsersContext<'_>) -> CoreResult<()> {
        Ok(())
    }

    fn register_tasks(&self, _ctx: &mut RegisterTasksContext<'_>) -> CoreResult<()> {
        Ok(())
    }
}

/// Plugins the host binary knows how to resolve, keyed by identifier.
#[derive(Clone, Default)]
pub struct PluginCatalog {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.insert(plugin);
        self
    }

    pub fn insert(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.insert(plugin.id().to_string(), plugin);
    }

    pub fn resolve(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(id).cloned()
    }

    pub fn known_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

pub struct PluginLoader {
    catalog: PluginCatalog,
    builtins: Vec<Arc<dyn Plugin>>,
}

impl PluginLoader {
    pub fn new(catalog: PluginCatalog) -> Self {
        Self {
            catalog,
            builtins: Vec::new(),
        }
    }

    /// Builtins always load, ahead of configured plugins.
    pub fn with_builtin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.builtins.push(plugin);
        self
    }

    pub fn load(&self, ids: &[String], project_root: &Path) -> CoreResult<LoadedPlugins> {
        let mut plugins = self.builtins.clone();
        for id in ids {
            if plugins.iter().any(|loaded| loaded.id() == id) {
                continue;
            }
            let plugin = self.catalog.resolve(id).ok_or_else(|| {
                CoreError::new(
                    CoreErrorKind::UnresolvedPlugin,
                    format!(
                        "plugin '{id}' listed for {} could not be resolved (available: {})",
                        project_root.display(),
                        self.catalog.known_ids().join(", ")
                    ),
                )
                .with_plugin(id.as_str())
                .with_path(project_root)
            })?;
            tracing::debug!(plugin = %id, "loaded plugin");
            plugins.push(plugin);
        }

        Ok(LoadedPlugins { plugins })
    }
}

pub struct LoadedPlugins {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl LoadedPlugins {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.id()).collect()
    }

    /// Runs each hook across every plugin, in plugin order, one hook at a time.
    pub fn run_hooks(&self, registries: &mut Registries) -> CoreResult<()> {
        for hook in Hook::ORDER {
            for plugin in &self.plugins {
                tracing::debug!(plugin = plugin.id(), hook = %hook, "running hook");
                let outcome = match hook {
                    Hook::RegisterParsers => plugin.register_parsers(&mut RegisterParsersContext {
                        parsers: &mut registries.parsers,
                    }),
                    Hook::RegisterTasks => plugin.register_tasks(&mut RegisterTasksContext {
                        parsers: &registries.parsers,
                        tasks: &mut registries.tasks,
                    }),
                };
                outcome.map_err(|error| hook_failure(error, plugin.id(), hook))?;
            }
        }

        Ok(())
    }

    pub fn register_all(&self) -> CoreResult<FrozenRegistries> {
        let mut registries = Registries::new();
        self.run_hooks(&mut registries)?;
        tracing::info!(
            parsers = registries.parsers.len(),
            tasks = registries.tasks.len(),
            "plugin registration complete"
        );
        Ok(registries.freeze())
    }
}

fn hook_failure(error: CoreError, plugin: &str, hook: Hook) -> CoreError {
    CoreError {
        kind: CoreErrorKind::HookFailure,
        task: error.task,
        plugin: error.plugin.or_else(|| Some(plugin.to_string())),
        path: error.path,
        message: format!("plugin '{plugin}' failed during {hook}: {}", error.message),
    }
}
