//! apiseq sequence
//!
//! Derives test sequences from a [`DependencyGraph`]:
//!
//! - [`CrudMap`]: which endpoints create, read, update and delete each object
//! - [`DependencyResolver`]: the objects an endpoint needs and the order they
//!   must exist in
//! - [`SequenceSynthesizer`]: preparation and dismantling plans over every
//!   valid ordering of those objects
//!
//! Ordering enumeration is factorial in the number of connected objects;
//! [`SynthesisConfig`] caps it and flags capped plans as truncated.
//!
//! [`DependencyGraph`]: apiseq_graph::DependencyGraph

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod crud;
pub mod error;
pub mod ordering;
pub mod resolver;
pub mod synthesizer;

// Re-exports
pub use crud::{classify_relation, CrudEntry, CrudMap, CrudOperation};
pub use error::{SequenceError, SequenceResult};
pub use ordering::{respects, valid_orderings, Orderings};
pub use resolver::{Dependencies, DependencyResolver, DEFAULT_MAX_PROPERTY_DEPTH};
pub use synthesizer::{
    mean_length, PlanStep, SequencePlan, SequenceSynthesizer, SynthesisConfig,
    DEFAULT_MAX_ORDERINGS, DEFAULT_MAX_PLANS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
