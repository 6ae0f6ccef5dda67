use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::models::{CoreResult, RunArgs, TaskDescriptor};
use crate::result::TaskResult;

pub type TaskFuture = Pin<Box<dyn Future<Output = CoreResult<Box<dyn TaskResult>>> + Send>>;

/// A single analysis instance, created per run and consumed by [`Task::run`].
pub trait Task: Send {
    fn run(self: Box<Self>) -> TaskFuture;
}

/// Task types whose identity and construction need nothing beyond [`RunArgs`].
pub trait NamedTask: Task + Sized + 'static {
    const DESCRIPTOR: TaskDescriptor;

    fn from_args(args: Arc<RunArgs>) -> Self;
}

type ConstructFn = dyn Fn(Arc<RunArgs>) -> Box<dyn Task> + Send + Sync;

/// Registry value for tasks: a factory, never an instance.
#[derive(Clone)]
pub struct TaskConstructor {
    descriptor: TaskDescriptor,
    construct: Arc<ConstructFn>,
}

impl TaskConstructor {
    pub fn new<T, F>(descriptor: TaskDescriptor, construct: F) -> Self
    where
        T: Task + 'static,
        F: Fn(Arc<RunArgs>) -> T + Send + Sync + 'static,
    {
        Self {
            descriptor,
            construct: Arc::new(move |args| Box::new(construct(args)) as Box<dyn Task>),
        }
    }

    pub fn of<T: NamedTask>() -> Self {
        Self::new(T::DESCRIPTOR, T::from_args)
    }

    pub fn descriptor(&self) -> TaskDescriptor {
        self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn construct(&self, args: Arc<RunArgs>) -> Box<dyn Task> {
        (self.construct)(args)
    }
}

impl Debug for TaskConstructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskConstructor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
