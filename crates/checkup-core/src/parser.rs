use serde_json::Value;

use crate::models::{CoreError, CoreErrorKind, CoreResult};

/// Interprets the text of a source artifact. Looked up by tasks, never by the scheduler.
pub trait Parser: Send + Sync {
    fn parse(&self, source: &str) -> CoreResult<Value>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, source: &str) -> CoreResult<Value> {
        serde_json::from_str(source).map_err(|error| {
            CoreError::new(CoreErrorKind::ParseFailure, format!("invalid JSON: {error}"))
        })
    }
}
