//! apiseq model
//!
//! The read-only fact base for one OpenAPI document.
//!
//! # Overview
//!
//! - **Loading**: [`load_model`] picks a [`DocumentParser`] by extension
//!   (JSON or YAML) and builds a [`SpecModel`]
//! - **Structure check**: `info.title`, `info.version` and `openapi` must be
//!   present before anything else is read
//! - **Lookup**: [`lookup`] and friends never fail on missing or
//!   wrong-shaped nested fields
//!
//! # Example
//!
//! ```rust
//! use apiseq_model::SpecModel;
//! use serde_json::json;
//!
//! let model = SpecModel::from_value(json!({
//!     "openapi": "3.0.0",
//!     "info": {"title": "Users", "version": "1"},
//!     "paths": {"/users": {"get": {}}}
//! }))
//! .unwrap();
//!
//! assert_eq!(model.info().name, "Users");
//! assert_eq!(model.operations().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod lookup;
pub mod parsers;

// Re-exports
pub use document::{ApiInfo, Operation, Parameter, ParameterLocation, SpecModel};
pub use error::{ModelError, ModelResult};
pub use lookup::{lookup, lookup_map, lookup_str, ref_at, schema_ref_name, SCHEMA_REF_PREFIX};
pub use parsers::{load_model, DocumentParser, JsonParser, ParserRegistry, YamlParser};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
