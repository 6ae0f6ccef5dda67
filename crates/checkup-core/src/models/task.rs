use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Static identity of a task implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TaskDescriptor {
    pub name: &'static str,
    pub friendly_name: &'static str,
}

impl TaskDescriptor {
    pub const fn new(name: &'static str, friendly_name: &'static str) -> Self {
        Self {
            name,
            friendly_name,
        }
    }

    pub fn has_valid_name(&self) -> bool {
        is_kebab_case(self.name)
    }
}

impl Display for TaskDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.friendly_name, self.name)
    }
}

/// Input shared read-only by every task in a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunArgs {
    path: PathBuf,
}

impl RunArgs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn package_json_path(&self) -> PathBuf {
        self.path.join(crate::project::PACKAGE_JSON)
    }
}

pub fn is_kebab_case(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_names() {
        assert!(is_kebab_case("dependencies"));
        assert!(is_kebab_case("ember-octane-migration"));
        assert!(is_kebab_case("es6-modules"));
        assert!(!is_kebab_case(""));
        assert!(!is_kebab_case("Dependencies"));
        assert!(!is_kebab_case("my_task"));
        assert!(!is_kebab_case("-leading"));
        assert!(!is_kebab_case("double--dash"));
    }

    #[test]
    fn run_args_resolve_package_json_under_root() {
        let args = RunArgs::new("/work/app");
        assert_eq!(args.path(), Path::new("/work/app"));
        assert_eq!(
            args.package_json_path(),
            PathBuf::from("/work/app/package.json")
        );
    }
}
