//! movies-api - CRUD handler for movie records behind an HTTP trigger
//!
//! One inbound event in, one response envelope out. The record store is
//! injected, so the same dispatcher runs behind the local HTTP server, the
//! one-shot CLI and the Lambda runtime.

pub mod auth;
pub mod cli;
pub mod codec;
pub mod config;
pub mod http_server;
pub mod movies;
pub mod observability;
pub mod store;

#[cfg(feature = "lambda")]
pub mod lambda;
