//! Tolerant lookups through a parsed document tree
//!
//! Missing keys and wrong-shaped intermediate values both resolve to
//! "not present"; nothing here fails.

use serde_json::{Map, Value};

/// Prefix of a local schema reference
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Prefix of a local parameter reference
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// Follow `keys` through nested mappings
#[must_use]
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in keys {
        match current {
            Value::Object(map) => current = map.get(*key)?,
            _ => return None,
        }
    }
    Some(current)
}

/// String at `keys`, or `""` when absent or not a string
#[must_use]
pub fn lookup_str<'a>(value: &'a Value, keys: &[&str]) -> &'a str {
    lookup(value, keys).and_then(Value::as_str).unwrap_or("")
}

/// Mapping at `keys`, or `None` when absent or not a mapping
#[must_use]
pub fn lookup_map<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    lookup(value, keys).and_then(Value::as_object)
}

/// Schema name referenced by `$ref`, if it is a local schema reference
#[must_use]
pub fn schema_ref_name(reference: &str) -> Option<&str> {
    reference
        .strip_prefix(SCHEMA_REF_PREFIX)
        .filter(|name| !name.is_empty())
}

/// Schema name behind `keys + ["$ref"]`
#[must_use]
pub fn ref_at<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    let mut path = keys.to_vec();
    path.push("$ref");
    schema_ref_name(lookup_str(value, &path))
}
