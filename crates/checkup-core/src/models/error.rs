use std::path::PathBuf;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CoreErrorKind {
    MissingProjectDescriptor,
    InvalidProjectDescriptor,
    InvalidConfig,
    UnresolvedPlugin,
    HookFailure,
    UnknownTask,
    TaskFailure,
    ParseFailure,
    Internal,
}

impl CoreErrorKind {
    /// Setup errors abort the run before any task is scheduled.
    pub fn is_setup(self) -> bool {
        matches!(
            self,
            Self::MissingProjectDescriptor
                | Self::InvalidProjectDescriptor
                | Self::InvalidConfig
                | Self::UnresolvedPlugin
                | Self::HookFailure
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct CoreError {
    pub kind: CoreErrorKind,
    pub task: Option<String>,
    pub plugin: Option<String>,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            task: None,
            plugin: None,
            path: None,
            message: message.into(),
        }
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn is_setup_error(&self) -> bool {
        self.kind.is_setup()
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_kinds_are_classified() {
        assert!(CoreError::new(CoreErrorKind::UnresolvedPlugin, "x").is_setup_error());
        assert!(CoreError::new(CoreErrorKind::HookFailure, "x").is_setup_error());
        assert!(!CoreError::new(CoreErrorKind::TaskFailure, "x").is_setup_error());
        assert!(!CoreError::new(CoreErrorKind::UnknownTask, "x").is_setup_error());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = CoreError::new(CoreErrorKind::ParseFailure, "unexpected token")
            .with_task("dependencies");
        assert_eq!(error.to_string(), "ParseFailure: unexpected token");
        assert_eq!(error.task.as_deref(), Some("dependencies"));
    }
}
