//! Error types for timestamp patching
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Error types for timestamp patching operations
#[derive(Debug, Error)]
pub enum StampError {
    /// Bad parameter provided to a function
    #[error("Bad parameter: {0}")]
    BadParam(String),

    /// Bad value provided (e.g., malformed date/time text)
    #[error("Bad value: {0}")]
    BadValue(String),

    /// Nothing to do: the reference field is missing or already matches
    #[error("Not applicable: {0}")]
    NotApplicable(String),

    /// The initial record lookup found no occurrence in the buffer
    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    /// Timezone magnitude or precision outside the packed codec's domain
    #[error("Timezone out of domain: {0}")]
    DomainViolation(String),

    /// The metadata collaborator failed or returned unusable output
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON decoding error
    #[cfg(feature = "exiftool")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StampError {
    /// Whether this error means "skip this field/file" rather than a failure
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            StampError::NotApplicable(_) | StampError::PatternNotFound(_)
        )
    }
}

/// Result type alias for timestamp patching operations
pub type StampResult<T> = Result<T, StampError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StampError::DomainViolation("-9.25".to_string());
        assert!(err.to_string().contains("Timezone out of domain: -9.25"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StampError = io_err.into();
        assert!(matches!(err, StampError::IoError(_)));
        assert!(!err.is_skip());
    }

    #[test]
    fn test_skip_classification() {
        assert!(StampError::NotApplicable("same".to_string()).is_skip());
        assert!(StampError::PatternNotFound("none".to_string()).is_skip());
        assert!(!StampError::BadValue("x".to_string()).is_skip());
    }
}
