use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinError;

use crate::models::{CoreError, CoreErrorKind, CoreResult, RunArgs, TaskDescriptor};
use crate::registry::TaskRegistry;
use crate::result::{TaskErrorResult, TaskResult};
use crate::task::TaskConstructor;

/// What happens to the batch when one task fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExecutionPolicy {
    /// The failure becomes a [`TaskErrorResult`] in the task's position.
    #[default]
    FailSoft,
    /// The first failure aborts the remaining tasks and is returned.
    FailFast,
}

/// Tasks selected for one run. Filled during setup, drained once by [`TaskList::run_tasks`].
#[derive(Debug, Default)]
pub struct TaskList {
    entries: Vec<(TaskConstructor, Arc<RunArgs>)>,
    policy: ExecutionPolicy,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ExecutionPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn add_task(&mut self, constructor: TaskConstructor, args: Arc<RunArgs>) {
        self.entries.push((constructor, args));
    }

    pub fn add_tasks(
        &mut self,
        constructors: impl IntoIterator<Item = TaskConstructor>,
        args: Arc<RunArgs>,
    ) {
        self.entries.extend(
            constructors
                .into_iter()
                .map(|constructor| (constructor, args.clone())),
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|(constructor, _)| constructor.name())
            .collect()
    }

    /// Runs every task concurrently. Results come back in insertion order,
    /// whatever order the tasks finish in.
    pub async fn run_tasks(self) -> CoreResult<Vec<Box<dyn TaskResult>>> {
        let total = self.entries.len();
        let mut pending = FuturesUnordered::new();
        let mut abort_handles = Vec::with_capacity(total);

        for (index, (constructor, args)) in self.entries.into_iter().enumerate() {
            let descriptor = constructor.descriptor();
            let task = constructor.construct(args);
            tracing::debug!(task = descriptor.name, index, "starting task");

            let started = Instant::now();
            let handle = tokio::spawn(task.run());
            abort_handles.push(handle.abort_handle());
            pending.push(handle.map(move |joined| (index, descriptor, started, joined)));
        }

        let mut slots: Vec<Option<Box<dyn TaskResult>>> = (0..total).map(|_| None).collect();
        while let Some((index, descriptor, started, joined)) = pending.next().await {
            let outcome = joined
                .map_err(|join_error| join_failure(descriptor, join_error))
                .and_then(|outcome| outcome.map_err(|error| attribute_error(error, descriptor)));

            match outcome {
                Ok(result) => {
                    tracing::info!(
                        task = descriptor.name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "task completed"
                    );
                    slots[index] = Some(result);
                }
                Err(error) if self.policy == ExecutionPolicy::FailFast => {
                    tracing::error!(
                        task = descriptor.name,
                        kind = ?error.kind,
                        message = %error.message,
                        "task failed, aborting remaining tasks"
                    );
                    for handle in &abort_handles {
                        handle.abort();
                    }
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(
                        task = descriptor.name,
                        kind = ?error.kind,
                        message = %error.message,
                        "task failed"
                    );
                    slots[index] = Some(Box::new(TaskErrorResult::new(descriptor, &error)));
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    CoreError::new(
                        CoreErrorKind::Internal,
                        format!("task at position {index} produced no result"),
                    )
                })
            })
            .collect()
    }
}

/// Constructors for one named task, or for every registered task when `name` is `None`.
pub fn select_tasks(registry: &TaskRegistry, name: Option<&str>) -> CoreResult<Vec<TaskConstructor>> {
    let Some(name) = name else {
        return Ok(registry.values().cloned().collect());
    };

    registry
        .get(name)
        .cloned()
        .map(|constructor| vec![constructor])
        .ok_or_else(|| {
            let known: Vec<&str> = registry.names().collect();
            let known = if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            };
            CoreError::new(
                CoreErrorKind::UnknownTask,
                format!("no task named '{name}' is registered (registered tasks: {known})"),
            )
            .with_task(name)
        })
}

fn attribute_error(error: CoreError, descriptor: TaskDescriptor) -> CoreError {
    CoreError {
        task: error.task.or_else(|| Some(descriptor.name.to_string())),
        ..error
    }
}

fn join_failure(descriptor: TaskDescriptor, join_error: JoinError) -> CoreError {
    let message = if join_error.is_panic() {
        format!("task '{}' panicked", descriptor.name)
    } else {
        format!("task '{}' was cancelled", descriptor.name)
    };
    CoreError::new(CoreErrorKind::Internal, message).with_task(descriptor.name)
}
