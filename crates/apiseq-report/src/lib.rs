//! apiseq report
//!
//! Runs the whole pipeline and assembles three JSON views:
//!
//! - `object_list`: per object, the endpoints it touches and how
//! - `object_crud`: per object, create/read/update/delete endpoints
//! - `endpoint_list`: per endpoint, connected objects, preparation and
//!   dismantling plans, and the expected sequence length
//!
//! # Example
//!
//! ```rust,ignore
//! use apiseq_report::{AnalysisConfig, Analyzer};
//!
//! let analyzer = Analyzer::new(AnalysisConfig::new().with_max_orderings(720));
//! let report = analyzer.analyze_path("openapi.yaml")?;
//! analyzer.export(&report, "out")?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod analyzer;
pub mod assembler;
pub mod config;
pub mod error;
pub mod views;

// Re-exports
pub use analyzer::{Analyzer, ENDPOINT_LIST_FILE, OBJECT_CRUD_FILE, OBJECT_LIST_FILE};
pub use assembler::{crud_view, endpoint_view, object_usage};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use views::{
    CrudLists, CrudReport, EndpointPlan, EndpointReport, ObjectUsageReport, Report, NO_OBJECT,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
