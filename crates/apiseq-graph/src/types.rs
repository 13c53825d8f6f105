//! Node and edge types of the dependency graph

use apiseq_model::ParameterLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an endpoint: one operation on one path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EndpointKey {
    /// Path template as declared
    pub path: String,
    /// Operation key as declared (`get`, `post`, ...)
    pub operation: String,
}

impl EndpointKey {
    /// Create an endpoint key
    #[must_use]
    pub fn new(path: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operation: operation.into(),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.path, self.operation)
    }
}

/// Outcome of matching one parameter against the schemas
///
/// Empty `object_name` means the parameter matched nothing; it is kept on the
/// endpoint but never becomes an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterResolution {
    /// Declared parameter name
    pub parameter_name: String,
    /// Declared location
    pub location: ParameterLocation,
    /// Matched object, empty when unresolved
    pub object_name: String,
    /// Matched property, empty when the whole object matched
    pub property_name: String,
}

impl ParameterResolution {
    /// Unresolved parameter
    #[must_use]
    pub fn unresolved(parameter_name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            location,
            object_name: String::new(),
            property_name: String::new(),
        }
    }

    /// Parameter resolved to an object (and optionally one of its properties)
    #[must_use]
    pub fn resolved(
        parameter_name: impl Into<String>,
        location: ParameterLocation,
        object_name: impl Into<String>,
        property_name: impl Into<String>,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            location,
            object_name: object_name.into(),
            property_name: property_name.into(),
        }
    }

    /// True when an object was matched
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.object_name.is_empty()
    }
}

/// Endpoint node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointNode {
    /// Identity
    pub key: EndpointKey,
    /// Every parameter's resolution, resolved or not, in declaration order
    pub parameters: Vec<ParameterResolution>,
}

/// Graph node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A schema from `components.schemas`
    Object(String),
    /// A `(path, operation)` pair
    Endpoint(EndpointNode),
}

impl Node {
    /// Human-readable identifier (object name or `"{path}, {operation}"`)
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Object(name) => name.clone(),
            Self::Endpoint(endpoint) => endpoint.key.to_string(),
        }
    }
}

/// Relation kind, without metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    /// Object → Object
    Property,
    /// Object → Endpoint
    RequestBody,
    /// Object → Endpoint
    Parameter,
    /// Endpoint → Object
    Response,
}

/// Typed graph edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Object has a property of type (or list of) another object
    Property {
        /// Property name on the owning object
        property_name: String,
        /// True for `items.$ref`
        is_list: bool,
    },
    /// Object appears in the request payload
    RequestBody,
    /// Object identified by a parameter
    Parameter {
        /// Declared parameter name
        parameter_name: String,
        /// Matched property, empty when the whole object matched
        property_name: String,
    },
    /// Object appears in a response payload
    Response {
        /// HTTP status key, e.g. `"200"` or `"default"`
        status_code: String,
    },
}

impl Relation {
    /// Kind without metadata
    #[must_use]
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::Property { .. } => RelationKind::Property,
            Self::RequestBody => RelationKind::RequestBody,
            Self::Parameter { .. } => RelationKind::Parameter,
            Self::Response { .. } => RelationKind::Response,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property { property_name, is_list } => {
                write!(f, "HAS_PROPERTY - {property_name}")?;
                if *is_list {
                    f.write_str(" []")?;
                }
                Ok(())
            }
            Self::RequestBody => f.write_str("IN_REQUEST_BODY"),
            Self::Parameter {
                parameter_name,
                property_name,
            } => write!(f, "IS_PARAMETER - {parameter_name} - {property_name}"),
            Self::Response { status_code } => write!(f, "IN_RESPONSE_BODY - {status_code}"),
        }
    }
}
