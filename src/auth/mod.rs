//! # Auth Module
//!
//! Bearer-token claim extraction for attaching a display name to records.
//! No authorization decision is ever made from these claims.

pub mod errors;
pub mod identity;

pub use errors::{AuthError, AuthResult};
pub use identity::{DisplayClaims, IdentityConfig, IdentityExtractor, IdentityMode, ANONYMOUS};
