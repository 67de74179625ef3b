//! # HTTP Server Module
//!
//! Local HTTP surface for the movies handler. Every request on `/movies`
//! becomes one inbound event and the resulting envelope becomes the
//! response.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/movies` - All methods, dispatched to the movies handler

pub mod config;
pub mod movies_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use movies_routes::{envelope_response, health_routes, movies_routes};
pub use server::HttpServer;
