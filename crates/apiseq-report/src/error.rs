//! Error types for the analysis pipeline
//!
//! Only failures that prevent a report from existing surface here:
//! - Document load and structural errors
//! - Configuration errors
//! - Report export errors
//!
//! Unresolved references and capped synthesis are absorbed into the report.

use apiseq_model::ModelError;
use apiseq_sequence::SequenceError;
use std::path::PathBuf;

/// Main analysis error type
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Document could not be loaded or lacks required structure
    #[error("document error: {0}")]
    Model(#[from] ModelError),

    /// Synthesis rejected its input
    #[error("synthesis error: {0}")]
    Sequence(#[from] SequenceError),

    /// Configuration file unreadable or invalid
    #[error("configuration error in {path}: {message}")]
    Config {
        /// Configuration file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Report could not be written
    #[error("failed to write {path}: {source}")]
    Export {
        /// Target file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Report could not be serialized
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Create configuration error
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True when the input document itself is at fault
    #[inline]
    #[must_use]
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::Model(_))
    }
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
