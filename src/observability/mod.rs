//! Observability
//!
//! Structured JSON logging. Request logs carry full error detail even when
//! the response body hides it.
//!
//! ```ignore
//! use movies_api::observability::Logger;
//!
//! Logger::info("MOVIES_REQUEST", &[("method", "GET"), ("status", "200")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
