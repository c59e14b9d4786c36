//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised when raw form input cannot become a [`crate::SoilSample`]. Plausibility
/// concerns are *not* errors; they are reported by [`crate::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. not a finite number).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A value fell outside the bounds the input form declares for it.
    #[error("{parameter} must be between {min} and {max} (got {value})")]
    OutOfBounds {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
