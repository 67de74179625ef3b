//! # Store Errors
//!
//! Error types for record store adapters.

use thiserror::Error;

use crate::codec::CodecError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A conditional write was rejected: the key was absent for an
    /// update/delete, or already present for a create
    #[error("Condition failed for key: {key}")]
    ConditionFailed { key: String },

    /// Item written without its key attribute
    #[error("Item is missing key attribute: {0}")]
    MissingKey(String),

    /// The backing service failed
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A stored value could not be converted
    #[error("{0}")]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub fn condition_failed(key: impl Into<String>) -> Self {
        StoreError::ConditionFailed { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_failed_message() {
        let err = StoreError::condition_failed("m-1");
        assert!(matches!(&err, StoreError::ConditionFailed { key } if key == "m-1"));
        assert_eq!(err.to_string(), "Condition failed for key: m-1");
    }

    #[test]
    fn test_codec_error_conversion() {
        let err = StoreError::from(CodecError::UnsupportedValue("binary".to_string()));
        assert_eq!(err.to_string(), "Unsupported value type: binary");
    }
}
