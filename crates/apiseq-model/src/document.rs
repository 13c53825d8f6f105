//! Normalised view of an OpenAPI document
//!
//! [`SpecModel`] is the fact base every later stage reads: the API info
//! block, the `components.schemas` section in declaration order, and one
//! [`Operation`] per `(path, method)` pair. It does no analysis.

use crate::error::{ModelError, ModelResult};
use crate::lookup::{lookup, lookup_map, lookup_str, PARAMETER_REF_PREFIX};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Path-item keys that never name an operation
const NON_OPERATION_KEYS: &[&str] = &["summary", "description", "servers", "parameters", "$ref"];

/// API identity copied verbatim from the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// `info.title`
    pub name: String,
    /// `info.version`
    pub version: String,
    /// `openapi`
    pub openapi_version: String,
}

impl ApiInfo {
    /// Read and check the info block of a document root
    ///
    /// # Errors
    /// Returns a structural error when a field is missing or the OpenAPI
    /// version is not 3.0.x / 3.1.x
    pub fn from_document(doc: &Value) -> ModelResult<Self> {
        if !doc.is_object() {
            return Err(ModelError::NotAMapping);
        }

        // YAML turns `version: 1.0` into a number; keep its text
        let field = |keys: &[&str], label: &'static str| match lookup(doc, keys) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(ModelError::MissingField(label)),
        };

        let name = field(&["info", "title"], "info.title")?;
        let version = field(&["info", "version"], "info.version")?;
        let openapi_version = field(&["openapi"], "openapi")?;

        if !(openapi_version.starts_with("3.0") || openapi_version.starts_with("3.1")) {
            return Err(ModelError::UnsupportedVersion(openapi_version));
        }

        Ok(Self {
            name,
            version,
            openapi_version,
        })
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Templated path segment
    Path,
    /// Query string
    Query,
    /// Request header
    Header,
    /// Cookie
    Cookie,
    /// Anything else the document declares
    Other,
}

impl ParameterLocation {
    /// Parse the `in` field of a parameter
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "path" => Self::Path,
            "query" => Self::Query,
            "header" => Self::Header,
            "cookie" => Self::Cookie,
            _ => Self::Other,
        }
    }

    /// Path and query parameters may identify an object by property
    #[inline]
    #[must_use]
    pub fn addresses_object(self) -> bool {
        matches!(self, Self::Path | Self::Query)
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A declared operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// `in` field
    pub location: ParameterLocation,
    /// `schema.type`, empty when not declared
    pub schema_type: String,
}

impl Parameter {
    /// Create a parameter
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        schema_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            schema_type: schema_type.into(),
        }
    }

    fn from_value(value: &Value, components: Option<&Map<String, Value>>) -> Option<Self> {
        let reference = lookup_str(value, &["$ref"]);
        let resolved = match reference.strip_prefix(PARAMETER_REF_PREFIX) {
            Some(key) => {
                let target = components.and_then(|c| c.get(key));
                if target.is_none() {
                    tracing::debug!(reference, "unresolved parameter reference skipped");
                }
                target?
            }
            None => value,
        };

        let name = lookup(resolved, &["name"]).and_then(Value::as_str)?;
        Some(Self::new(
            name,
            ParameterLocation::parse(lookup_str(resolved, &["in"])),
            lookup_str(resolved, &["schema", "type"]),
        ))
    }
}

/// One HTTP operation on one path
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Path template, e.g. `/users/{id}`
    pub path: String,
    /// Method key as declared, e.g. `post`
    pub method: String,
    /// Effective parameters (path-level merged with operation-level)
    pub parameters: Vec<Parameter>,
    details: Value,
}

impl Operation {
    /// Raw operation object
    #[inline]
    #[must_use]
    pub fn details(&self) -> &Value {
        &self.details
    }

    /// `requestBody.content`, keyed by media type
    #[must_use]
    pub fn request_body_content(&self) -> Option<&Map<String, Value>> {
        lookup_map(&self.details, &["requestBody", "content"])
    }

    /// Declared responses as `(status, content)` in declaration order
    pub fn responses(&self) -> impl Iterator<Item = (&str, Option<&Map<String, Value>>)> {
        lookup_map(&self.details, &["responses"])
            .into_iter()
            .flat_map(|responses| responses.iter())
            .map(|(status, response)| (status.as_str(), lookup_map(response, &["content"])))
    }
}

/// Read-only fact base over one OpenAPI document
#[derive(Debug, Clone, PartialEq)]
pub struct SpecModel {
    info: ApiInfo,
    schemas: IndexMap<String, Value>,
    operations: Vec<Operation>,
}

impl SpecModel {
    /// Build the model from a parsed document tree
    ///
    /// # Errors
    /// Returns a structural error when `info.title`, `info.version` or
    /// `openapi` are missing, before anything else is read.
    pub fn from_value(doc: Value) -> ModelResult<Self> {
        let info = ApiInfo::from_document(&doc)?;

        let schemas: IndexMap<String, Value> = lookup_map(&doc, &["components", "schemas"])
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let parameter_components = lookup_map(&doc, &["components", "parameters"]);
        let mut operations = Vec::new();

        if let Some(paths) = lookup_map(&doc, &["paths"]) {
            for (path, item) in paths {
                let Some(item) = item.as_object() else {
                    tracing::debug!(path = %path, "path item is not a mapping");
                    continue;
                };
                let shared = parse_parameters(item.get("parameters"), parameter_components);

                for (method, details) in item {
                    if NON_OPERATION_KEYS.contains(&method.as_str()) || method.starts_with("x-") {
                        continue;
                    }
                    let own = parse_parameters(details.get("parameters"), parameter_components);
                    operations.push(Operation {
                        path: path.clone(),
                        method: method.clone(),
                        parameters: merge_parameters(&shared, own),
                        details: details.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            schemas = schemas.len(),
            operations = operations.len(),
            "document model ready"
        );

        Ok(Self {
            info,
            schemas,
            operations,
        })
    }

    /// API identity
    #[inline]
    #[must_use]
    pub fn info(&self) -> &ApiInfo {
        &self.info
    }

    /// Schemas in declaration order
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schemas.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Schema by exact name
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Number of declared schemas
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Operations in declaration order
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

fn parse_parameters(
    raw: Option<&Value>,
    components: Option<&Map<String, Value>>,
) -> Vec<Parameter> {
    raw.and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|p| Parameter::from_value(p, components))
                .collect()
        })
        .unwrap_or_default()
}

/// Operation-level parameters override path-level ones with the same `(name, in)`
fn merge_parameters(shared: &[Parameter], own: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = shared
        .iter()
        .filter(|s| {
            !own
                .iter()
                .any(|o| o.name == s.name && o.location == s.location)
        })
        .cloned()
        .collect();
    merged.extend(own);
    merged
}
