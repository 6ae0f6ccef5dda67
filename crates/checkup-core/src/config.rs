use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::models::{CoreError, CoreErrorKind, CoreResult};

pub const CONFIG_FILE: &str = ".checkuprc";
pub const PLUGIN_PREFIX: &str = "checkup-plugin-";

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckupConfig {
    #[serde(default)]
    pub plugins: Vec<String>,
}

impl CheckupConfig {
    /// Normalized plugin identifiers in config order, first occurrence wins.
    pub fn plugin_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.plugins.len());
        for id in self.plugins.iter().map(|plugin| normalize_plugin_id(plugin)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

pub fn load_config(project_root: &Path) -> CoreResult<CheckupConfig> {
    let path = project_root.join(CONFIG_FILE);
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(error) if matches!(error.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CheckupConfig::default());
        }
        Err(error) => {
            return Err(CoreError::new(
                CoreErrorKind::InvalidConfig,
                format!("failed to read {}: {error}", path.display()),
            )
            .with_path(path));
        }
    };

    serde_json::from_str(&source).map_err(|error| {
        CoreError::new(
            CoreErrorKind::InvalidConfig,
            format!("{} is not a valid checkup config: {error}", path.display()),
        )
        .with_path(&path)
    })
}

pub fn normalize_plugin_id(id: &str) -> String {
    let id = id.trim();
    if id.starts_with(PLUGIN_PREFIX) || id.starts_with('@') {
        id.to_string()
    } else {
        format!("{PLUGIN_PREFIX}{id}")
    }
}
