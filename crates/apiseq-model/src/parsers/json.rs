//! JSON document parser

use crate::error::{ModelError, ModelResult};
use crate::parsers::DocumentParser;
use serde_json::Value;

/// JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn parse(&self, content: &str) -> ModelResult<Value> {
        serde_json::from_str(content)
            .map_err(|e| ModelError::syntax_error("input.json", format!("JSON parse error: {e}")))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
