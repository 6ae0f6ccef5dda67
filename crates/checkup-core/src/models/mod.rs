pub mod error;
pub mod task;

pub use error::{CoreError, CoreErrorKind, CoreResult};
pub use task::{RunArgs, TaskDescriptor, is_kebab_case};
