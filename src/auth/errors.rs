//! # Auth Errors
//!
//! Error types for bearer-token claim extraction.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Bearer-token decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Issuer or audience did not match
    #[error("Invalid token claims")]
    InvalidClaims,
}
