use std::collections::HashMap;
use std::sync::Arc;

use crate::parser::Parser;
use crate::task::TaskConstructor;

pub type TaskRegistry = Registry<TaskConstructor>;
pub type ParserRegistry = Registry<Arc<dyn Parser>>;

/// Name-keyed capability map with stable insertion order.
///
/// Registering an existing name replaces the value in place (last write wins)
/// and keeps the original position in [`Registry::values`].
pub struct Registry<C> {
    kind: &'static str,
    entries: Vec<(String, C)>,
    positions: HashMap<String, usize>,
}

impl<C> Registry<C> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, capability: C) {
        let name = name.into();
        match self.positions.get(&name) {
            Some(&index) => {
                tracing::warn!(
                    registry = self.kind,
                    name = %name,
                    "registration replaces an existing entry with the same name"
                );
                self.entries[index].1 = capability;
            }
            None => {
                tracing::debug!(registry = self.kind, name = %name, "registered");
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, capability));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&C> {
        self.positions
            .get(name)
            .map(|&index| &self.entries[index].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn values(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().map(|(_, capability)| capability)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TaskRegistry {
    pub fn tasks() -> Self {
        Self::new("tasks")
    }
}

impl ParserRegistry {
    pub fn parsers() -> Self {
        Self::new("parsers")
    }
}

/// The registry pair for one invocation, filled by plugin hooks.
pub struct Registries {
    pub parsers: ParserRegistry,
    pub tasks: TaskRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            parsers: ParserRegistry::parsers(),
            tasks: TaskRegistry::tasks(),
        }
    }

    pub fn freeze(self) -> FrozenRegistries {
        FrozenRegistries {
            parsers: Arc::new(self.parsers),
            tasks: Arc::new(self.tasks),
        }
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only registries shared while tasks are scheduled and run.
#[derive(Clone)]
pub struct FrozenRegistries {
    pub parsers: Arc<ParserRegistry>,
    pub tasks: Arc<TaskRegistry>,
}
