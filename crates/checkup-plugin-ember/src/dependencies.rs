use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use checkup_core::models::{CoreError, CoreErrorKind, RunArgs, TaskDescriptor};
use checkup_core::project::PackageJson;
use checkup_core::result::{
    JsonRecord, TaskResult, keyed_record, write_entries, write_map, write_section,
    write_subheader,
};
use checkup_core::task::{Task, TaskConstructor, TaskFuture};
use checkup_core::Parser;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub const DESCRIPTOR: TaskDescriptor = TaskDescriptor::new("dependencies", "Project Dependencies");

pub const EMBER_LIBRARIES: [&str; 3] = ["ember-source", "ember-cli", "ember-data"];
pub const NOT_FOUND: &str = "Not found";

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGroups {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl DependencyGroups {
    fn filtered(package: &PackageJson, filter: fn(&str) -> bool) -> Self {
        Self {
            dependencies: find_dependencies(&package.dependencies, filter),
            dev_dependencies: find_dependencies(&package.dev_dependencies, filter),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DependenciesTaskResult {
    /// One entry per `EMBER_LIBRARIES` name, in that order.
    pub ember_libraries: Vec<(&'static str, String)>,
    pub ember_addons: DependencyGroups,
    pub ember_cli_addons: DependencyGroups,
}

impl DependenciesTaskResult {
    pub fn from_package(package: &PackageJson) -> Self {
        let ember_libraries = EMBER_LIBRARIES
            .iter()
            .map(|&library| {
                let version = package.find_dependency(library).unwrap_or(NOT_FOUND);
                (library, version.to_string())
            })
            .collect();

        Self {
            ember_libraries,
            ember_addons: DependencyGroups::filtered(package, is_ember_addon),
            ember_cli_addons: DependencyGroups::filtered(package, is_ember_cli_addon),
        }
    }

    pub fn library_version(&self, library: &str) -> Option<&str> {
        self.ember_libraries
            .iter()
            .find(|(name, _)| *name == library)
            .map(|(_, version)| version.as_str())
    }
}

impl TaskResult for DependenciesTaskResult {
    fn to_json(&self) -> JsonRecord {
        let libraries: Map<String, Value> = self
            .ember_libraries
            .iter()
            .map(|(name, version)| (name.to_string(), Value::String(version.clone())))
            .collect();

        keyed_record(
            DESCRIPTOR.name,
            json!({
                "emberLibraries": libraries,
                "emberAddons": self.ember_addons,
                "emberCliAddons": self.ember_cli_addons,
            }),
        )
    }

    fn to_console(&self, out: &mut dyn Write) -> io::Result<()> {
        write_section(out, DESCRIPTOR.friendly_name)?;

        write_subheader(out, "Ember Libraries")?;
        write_entries(
            out,
            self.ember_libraries
                .iter()
                .map(|(name, version)| (*name, version.as_str())),
        )?;

        for (title, groups) in [
            ("Ember Addons", &self.ember_addons),
            ("Ember CLI Addons", &self.ember_cli_addons),
        ] {
            write_subheader(out, &format!("{title} (dependencies)"))?;
            write_map(out, &groups.dependencies)?;
            write_subheader(out, &format!("{title} (devDependencies)"))?;
            write_map(out, &groups.dev_dependencies)?;
        }

        Ok(())
    }
}

pub struct DependenciesTask {
    args: Arc<RunArgs>,
    parser: Arc<dyn Parser>,
}

impl DependenciesTask {
    pub fn constructor(parser: Arc<dyn Parser>) -> TaskConstructor {
        TaskConstructor::new(DESCRIPTOR, move |args| DependenciesTask {
            args,
            parser: parser.clone(),
        })
    }
}

impl Task for DependenciesTask {
    fn run(self: Box<Self>) -> TaskFuture {
        Box::pin(async move {
            let path = self.args.package_json_path();
            let source = tokio::fs::read_to_string(&path).await.map_err(|error| {
                CoreError::new(
                    CoreErrorKind::TaskFailure,
                    format!("failed to read {}: {error}", path.display()),
                )
                .with_path(&path)
            })?;

            let package = PackageJson::from_value(self.parser.parse(&source)?, &path)?;
            tracing::debug!(
                dependencies = package.dependencies.len(),
                dev_dependencies = package.dev_dependencies.len(),
                "classifying ember dependencies"
            );

            Ok(Box::new(DependenciesTaskResult::from_package(&package)) as Box<dyn TaskResult>)
        })
    }
}

fn find_dependencies(
    dependencies: &BTreeMap<String, String>,
    filter: fn(&str) -> bool,
) -> BTreeMap<String, String> {
    dependencies
        .iter()
        .filter(|(name, _)| filter(name))
        .map(|(name, version)| (name.clone(), version.clone()))
        .collect()
}

fn is_ember_addon(name: &str) -> bool {
    name.starts_with("ember-") && !name.starts_with("ember-cli")
}

fn is_ember_cli_addon(name: &str) -> bool {
    name.starts_with("ember-cli")
}
