use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CoreError, CoreErrorKind, CoreResult};

pub const PACKAGE_JSON: &str = "package.json";

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PackageJson {
    pub fn from_value(value: Value, path: &Path) -> CoreResult<Self> {
        serde_json::from_value(value).map_err(|error| invalid_descriptor(path, &error))
    }

    /// Version from `dependencies`, then `devDependencies`.
    pub fn find_dependency(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }
}

/// Absolute form of `path` used in user-facing messages.
pub fn resolve_project_root(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

pub fn read_package_json(project_root: &Path) -> CoreResult<PackageJson> {
    let path = project_root.join(PACKAGE_JSON);
    let source = fs::read_to_string(&path).map_err(|error| match error.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => missing_descriptor(project_root),
        _ => CoreError::new(
            CoreErrorKind::InvalidProjectDescriptor,
            format!("failed to read {}: {error}", path.display()),
        )
        .with_path(&path),
    })?;

    serde_json::from_str(&source).map_err(|error| invalid_descriptor(&path, &error))
}

pub fn missing_descriptor(project_root: &Path) -> CoreError {
    let resolved = resolve_project_root(project_root);
    CoreError::new(
        CoreErrorKind::MissingProjectDescriptor,
        format!(
            "The {} directory found through the 'path' option does not contain a package.json file. You must run checkup in a directory with a package.json file.",
            resolved.display()
        ),
    )
    .with_path(resolved)
}

fn invalid_descriptor(path: &Path, error: &serde_json::Error) -> CoreError {
    CoreError::new(
        CoreErrorKind::InvalidProjectDescriptor,
        format!("{} is not a valid package.json: {error}", path.display()),
    )
    .with_path(path)
}
