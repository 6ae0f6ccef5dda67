use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::{self, Write};

use colored::Colorize;
use serde_json::{Map, Value};

use crate::models::{CoreError, TaskDescriptor};

pub type JsonRecord = Map<String, Value>;

/// Output of one task. The scheduler only ever serializes or renders it.
pub trait TaskResult: Send + Sync + Debug {
    /// Plain record keyed by the producing task's name.
    fn to_json(&self) -> JsonRecord;

    fn to_console(&self, out: &mut dyn Write) -> io::Result<()>;

    fn is_error(&self) -> bool {
        false
    }
}

/// Stands in for a task that failed while the batch ran in fail-soft mode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskErrorResult {
    pub descriptor: TaskDescriptor,
    pub message: String,
}

impl TaskErrorResult {
    pub fn new(descriptor: TaskDescriptor, error: &CoreError) -> Self {
        Self {
            descriptor,
            message: error.message.clone(),
        }
    }
}

impl TaskResult for TaskErrorResult {
    fn to_json(&self) -> JsonRecord {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.message.clone()));
        keyed_record(self.descriptor.name, Value::Object(body))
    }

    fn to_console(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{} {}",
            format!("✖ {} failed:", self.descriptor.friendly_name).red().bold(),
            self.message
        )?;
        writeln!(out)
    }

    fn is_error(&self) -> bool {
        true
    }
}

pub fn keyed_record(task_name: &str, value: Value) -> JsonRecord {
    let mut record = Map::new();
    record.insert(task_name.to_string(), value);
    record
}

/// Folds every record into one report. A later key replaces an earlier one.
pub fn merge_task_results(results: &[Box<dyn TaskResult>]) -> JsonRecord {
    results.iter().fold(Map::new(), |mut merged, result| {
        merged.extend(result.to_json());
        merged
    })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Console,
    Json,
    Silent,
}

impl OutputMode {
    pub fn from_flags(json: bool, silent: bool) -> Self {
        match (silent, json) {
            (true, _) => Self::Silent,
            (false, true) => Self::Json,
            (false, false) => Self::Console,
        }
    }
}

pub fn render_results(
    results: &[Box<dyn TaskResult>],
    mode: OutputMode,
    out: &mut dyn Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Silent => Ok(()),
        OutputMode::Json => {
            let report = Value::Object(merge_task_results(results));
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)
        }
        OutputMode::Console => {
            for result in results {
                result.to_console(out)?;
            }
            Ok(())
        }
    }
}

pub fn write_section(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", title.bold().underline())?;
    writeln!(out)
}

pub fn write_subheader(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", title.bold())
}

pub fn write_entries<'a>(
    out: &mut dyn Write,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> io::Result<()> {
    let entries: Vec<_> = entries.into_iter().collect();
    if entries.is_empty() {
        writeln!(out, "  {}", "(none)".dimmed())?;
        return writeln!(out);
    }

    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in entries {
        writeln!(out, "  {key:<width$}  {value}")?;
    }
    writeln!(out)
}

pub fn write_map(out: &mut dyn Write, map: &BTreeMap<String, String>) -> io::Result<()> {
    write_entries(out, map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoreErrorKind;

    #[test]
    fn output_mode_prefers_silent() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Silent);
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Console);
    }

    #[test]
    fn error_result_serializes_under_task_name() {
        let result = TaskErrorResult::new(
            TaskDescriptor::new("dependencies", "Project Dependencies"),
            &CoreError::new(CoreErrorKind::TaskFailure, "boom"),
        );
        assert_eq!(
            Value::Object(result.to_json()),
            serde_json::json!({ "dependencies": { "error": "boom" } })
        );
        assert!(result.is_error());
    }

    #[test]
    fn entries_are_aligned() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_entries(&mut out, [("ember-source", "3.12.0"), ("ember-cli", "3.1")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "  ember-source  3.12.0\n  ember-cli     3.1\n\n");
    }
}
