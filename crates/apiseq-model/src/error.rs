//! Error types for document loading and model construction
//!
//! Two families:
//! - Load errors (unknown format, IO, syntax) raised before a document tree exists
//! - Structural errors raised when the tree lacks the fields every report carries

use std::path::PathBuf;

/// Errors while loading a document or building a [`SpecModel`](crate::SpecModel)
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No parser handles the file extension
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON or YAML syntax error
    #[error("syntax error in {path}: {message}")]
    SyntaxError { path: PathBuf, message: String },

    /// Document root is not a mapping
    #[error("document root must be a mapping")]
    NotAMapping,

    /// A required top-level field is absent or not a string
    #[error("missing required field: '{0}'")]
    MissingField(&'static str),

    /// `openapi` is neither 3.0.x nor 3.1.x
    #[error("unsupported OpenAPI version '{0}': expected 3.0.x or 3.1.x")]
    UnsupportedVersion(String),
}

impl ModelError {
    /// Create syntax error for path
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the document parsed but lacks required structure
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::NotAMapping | Self::MissingField(_) | Self::UnsupportedVersion(_)
        )
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
