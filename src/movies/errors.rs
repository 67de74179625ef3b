//! # Movie Errors
//!
//! Every request outcome that is not a success. All of them are turned into
//! an envelope at the dispatcher boundary; none escapes to the caller.

use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Result type for movie operations
pub type MovieResult<T> = Result<T, MovieError>;

/// Fixed message returned for unexpected failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error taxonomy surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 400
    Validation,
    /// 404
    NotFound,
    /// 500
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

/// Movie request errors
#[derive(Debug, Clone, Error)]
pub enum MovieError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing or invalid input, or an unsupported method
    #[error("{0}")]
    Validation(String),

    /// Referenced movie does not exist
    #[error("Movie not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Body absent, not JSON, or not a JSON object
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Record store failure
    #[error("{0}")]
    Store(StoreError),

    /// Stored value could not be converted
    #[error("{0}")]
    Codec(#[from] CodecError),
}

impl MovieError {
    pub fn validation(message: impl Into<String>) -> Self {
        MovieError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MovieError::Validation(_) => ErrorKind::Validation,
            MovieError::NotFound => ErrorKind::NotFound,
            MovieError::MalformedBody(_) | MovieError::Store(_) | MovieError::Codec(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Unexpected => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Message for the response body. Unexpected failures are replaced by
    /// a fixed message unless `expose_internal` is set.
    pub fn public_message(&self, expose_internal: bool) -> String {
        if self.is_client_error() || expose_internal {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

/// A rejected conditional write means the key was not there
impl From<StoreError> for MovieError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConditionFailed { .. } => MovieError::NotFound,
            other => MovieError::Store(other),
        }
    }
}
