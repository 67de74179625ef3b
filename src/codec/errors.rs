//! # Codec Errors

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Failures converting between wire JSON and stored attributes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Text is not a number at all
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Valid number that does not fit the exact decimal range
    #[error("Number out of range: {0}")]
    NumberOutOfRange(String),

    /// Stored value type with no JSON counterpart
    #[error("Unsupported value type: {0}")]
    UnsupportedValue(String),
}
