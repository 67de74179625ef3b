//! # Movies
//!
//! The movies catalog resource: inbound event routing, payload validation,
//! partial-update derivation and the response envelope.

pub mod dispatcher;
pub mod envelope;
pub mod errors;
pub mod record;
pub mod request;

pub use dispatcher::Dispatcher;
pub use envelope::{EnvelopeBuilder, Reply, ResponseEnvelope, CORS_HEADERS};
pub use errors::{ErrorKind, MovieError, MovieResult, INTERNAL_ERROR_MESSAGE};
pub use record::{Movie, MoviePatch, MoviePayload, NewMovie};
pub use request::{HttpMethod, InboundEvent};
