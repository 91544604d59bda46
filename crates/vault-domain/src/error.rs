//! Validation errors raised before any write is attempted

use thiserror::Error;

/// A payload failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field was present but not acceptable
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
