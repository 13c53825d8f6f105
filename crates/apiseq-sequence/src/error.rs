//! Sequence synthesis errors

use thiserror::Error;

/// Errors from resolving or synthesizing a single endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// Endpoint key is not in the graph
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// Configuration value out of range
    #[error("invalid synthesis configuration: {0}")]
    InvalidConfig(String),
}

impl SequenceError {
    /// Create unknown endpoint error
    pub fn unknown_endpoint(key: impl ToString) -> Self {
        Self::UnknownEndpoint(key.to_string())
    }
}

/// Result type for sequence operations
pub type SequenceResult<T> = Result<T, SequenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SequenceError::unknown_endpoint("/x, get");
        assert_eq!(err.to_string(), "unknown endpoint: /x, get");
    }
}
