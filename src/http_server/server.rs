//! # HTTP Server
//!
//! Binds the movies and health routes to a TCP listener.

use std::io;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::movies::Dispatcher;
use crate::observability::Logger;
use crate::store::RecordStore;

use super::config::HttpServerConfig;
use super::movies_routes::{health_routes, movies_routes};

/// HTTP server over one dispatcher
pub struct HttpServer<S> {
    config: HttpServerConfig,
    dispatcher: Arc<Dispatcher<S>>,
}

impl<S: RecordStore + 'static> HttpServer<S> {
    /// Create a new HTTP server with default configuration
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self::with_config(dispatcher, HttpServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(dispatcher: Dispatcher<S>, config: HttpServerConfig) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Build the combined router
    pub fn router(&self) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(movies_routes(
                Arc::clone(&self.dispatcher),
                self.config.max_body_bytes,
            ))
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?.to_string();
        let max_body_bytes = self.config.max_body_bytes.to_string();

        Logger::info(
            "MOVIES_HTTP_STARTED",
            &[
                ("addr", addr.as_str()),
                ("max_body_bytes", max_body_bytes.as_str()),
            ],
        );

        axum::serve(listener, self.router()).await
    }
}
