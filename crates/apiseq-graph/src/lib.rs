//! apiseq graph
//!
//! Dependency graph between the objects (schemas) and endpoints
//! (path/operation pairs) of one OpenAPI document.
//!
//! # Edges
//!
//! | Relation | Direction | Meaning |
//! |---|---|---|
//! | `Property` | Object → Object | property typed as (a list of) the target |
//! | `RequestBody` | Object → Endpoint | object sent in the request payload |
//! | `Parameter` | Object → Endpoint | object identified by a path/query parameter |
//! | `Response` | Endpoint → Object | object returned for a status code |
//!
//! Parameters are matched to objects by name heuristics; see
//! [`ObjectMatcher`].

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod builder;
pub mod graph;
pub mod matcher;
pub mod types;

// Re-exports
pub use builder::GraphBuilder;
pub use graph::{DependencyGraph, EdgeView};
pub use matcher::{content_objects, ObjectMatcher};
pub use types::{EndpointKey, EndpointNode, Node, ParameterResolution, Relation, RelationKind};

/// Build the dependency graph of `model`
#[must_use]
pub fn build_graph(model: &apiseq_model::SpecModel) -> DependencyGraph {
    GraphBuilder::new(model).build()
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
