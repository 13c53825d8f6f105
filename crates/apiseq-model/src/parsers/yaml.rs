//! YAML document parser
//!
//! YAML allows non-string mapping keys (`200:` is an integer), a JSON tree
//! does not, so the parsed value is converted with keys rendered as text.

use crate::error::{ModelError, ModelResult};
use crate::parsers::DocumentParser;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(&self, content: &str) -> ModelResult<Value> {
        let yaml: YamlValue = serde_yaml::from_str(content)
            .map_err(|e| ModelError::syntax_error("input.yaml", format!("YAML parse error: {e}")))?;
        Ok(to_json(yaml))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

fn to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(seq) => Value::Array(seq.into_iter().map(to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                match key_text(&key) {
                    Some(key) => {
                        map.insert(key, to_json(value));
                    }
                    None => tracing::debug!(?key, "non-scalar mapping key dropped"),
                }
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => to_json(tagged.value),
    }
}

fn key_text(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Null => Some("null".to_string()),
        YamlValue::Tagged(tagged) => key_text(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn yaml_parser_valid() {
        let value = YamlParser
            .parse(
                r"
openapi: 3.0.1
info:
  title: Store
  version: v1
",
            )
            .unwrap();
        assert_eq!(value["info"]["title"], "Store");
        assert_eq!(value["openapi"], "3.0.1");
    }

    #[test]
    fn yaml_integer_keys_become_strings() {
        let value = YamlParser
            .parse(
                r"
responses:
  200:
    description: ok
  default:
    description: error
",
            )
            .unwrap();
        assert_eq!(
            value,
            json!({"responses": {"200": {"description": "ok"}, "default": {"description": "error"}}})
        );
    }

    #[test]
    fn yaml_keeps_key_order() {
        let value = YamlParser.parse("b: 1\na: 2\nc: 3\n").unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn yaml_parser_invalid() {
        assert!(matches!(
            YamlParser.parse("a: [1, 2"),
            Err(ModelError::SyntaxError { .. })
        ));
    }

    #[test]
    fn yaml_parser_extensions() {
        assert!(YamlParser.extensions().contains(&"yaml"));
        assert!(YamlParser.extensions().contains(&"yml"));
    }
}
