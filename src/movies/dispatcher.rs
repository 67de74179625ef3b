//! # Request Dispatcher
//!
//! Routes an inbound event by method, validates input, drives the record
//! store and produces exactly one envelope per event.
//!
//! | Method    | Action                                     |
//! |-----------|--------------------------------------------|
//! | `OPTIONS` | preflight, no store access                 |
//! | `GET`     | read-one with `?movieId=`, otherwise list  |
//! | `POST`    | create                                     |
//! | `PUT`     | update                                     |
//! | `DELETE`  | delete, `movieId` from query then body     |
//! | other     | 400, no store access                       |
//!
//! Update and delete are single conditional writes: a missing key is
//! reported by the store rather than checked beforehand.

use std::time::Instant;

use crate::auth::IdentityExtractor;
use crate::config::AppConfig;
use crate::observability::Logger;
use crate::store::{RecordStore, KEY_ATTRIBUTE};

use super::envelope::{EnvelopeBuilder, Reply, ResponseEnvelope};
use super::errors::{MovieError, MovieResult};
use super::record::{Movie, MoviePatch, MoviePayload, NewMovie};
use super::request::{HttpMethod, InboundEvent};

/// Per-request handler over an injected record store
#[derive(Debug)]
pub struct Dispatcher<S> {
    store: S,
    identity: IdentityExtractor,
    envelopes: EnvelopeBuilder,
}

impl<S: RecordStore> Dispatcher<S> {
    /// Dispatcher with unverified identity extraction and hidden internal
    /// errors
    pub fn new(store: S) -> Self {
        Self {
            store,
            identity: IdentityExtractor::unverified(),
            envelopes: EnvelopeBuilder::default(),
        }
    }

    pub fn from_config(store: S, config: &AppConfig) -> Self {
        Self {
            store,
            identity: IdentityExtractor::new(&config.identity),
            envelopes: EnvelopeBuilder::new(config.expose_internal_errors),
        }
    }

    pub fn with_identity(mut self, identity: IdentityExtractor) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_envelopes(mut self, envelopes: EnvelopeBuilder) -> Self {
        self.envelopes = envelopes;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one event. Never fails: errors become error envelopes.
    pub async fn handle(&self, event: InboundEvent) -> ResponseEnvelope {
        let started = Instant::now();
        let result = self.route(&event).await;
        let elapsed_us = started.elapsed().as_micros().to_string();
        let method = event.http_method.as_str();

        match result {
            Ok(reply) => {
                let envelope = self.envelopes.reply(&reply);
                let status = envelope.status_code.to_string();
                Logger::info(
                    "MOVIES_REQUEST",
                    &[
                        ("method", method),
                        ("status", status.as_str()),
                        ("outcome", "ok"),
                        ("elapsed_us", elapsed_us.as_str()),
                    ],
                );
                envelope
            }
            Err(err) => {
                let envelope = self.envelopes.error(&err);
                let status = envelope.status_code.to_string();
                let detail = err.to_string();
                let fields = [
                    ("method", method),
                    ("status", status.as_str()),
                    ("outcome", err.kind().as_str()),
                    ("error", detail.as_str()),
                    ("elapsed_us", elapsed_us.as_str()),
                ];

                // Full detail stays in the log even when the body hides it
                if err.is_client_error() {
                    Logger::warn("MOVIES_REQUEST", &fields);
                } else {
                    Logger::error("MOVIES_INTERNAL_ERROR", &fields);
                }
                envelope
            }
        }
    }

    async fn route(&self, event: &InboundEvent) -> MovieResult<Reply> {
        match event.http_method.parse::<HttpMethod>()? {
            HttpMethod::Options => Ok(Reply::Preflight),
            HttpMethod::Get => match event.query_param(KEY_ATTRIBUTE) {
                Some(movie_id) => self.read_one(movie_id).await,
                None => self.list().await,
            },
            HttpMethod::Post => self.create(event).await,
            HttpMethod::Put => self.update(event).await,
            HttpMethod::Delete => self.delete(event).await,
        }
    }

    async fn list(&self) -> MovieResult<Reply> {
        let items = self.store.scan().await?;
        Ok(Reply::Movies(items))
    }

    async fn read_one(&self, movie_id: &str) -> MovieResult<Reply> {
        self.store
            .get(movie_id)
            .await?
            .map(Reply::Movie)
            .ok_or(MovieError::NotFound)
    }

    async fn create(&self, event: &InboundEvent) -> MovieResult<Reply> {
        let body = event.body_text()?;
        let payload = MoviePayload::parse(body.as_deref())?;
        let new = NewMovie::from_payload(&payload)?;

        let username = self.identity.display_name(event.headers.as_ref());
        let movie = Movie::create(new, username);
        let movie_id = movie.movie_id.clone();

        // A key collision is a fault, not a missing record
        self.store
            .put(movie.into_item())
            .await
            .map_err(MovieError::Store)?;

        Ok(Reply::Created { movie_id })
    }

    async fn update(&self, event: &InboundEvent) -> MovieResult<Reply> {
        let body = event.body_text()?;
        let payload = MoviePayload::parse(body.as_deref())?;
        let patch = MoviePatch::from_payload(&payload)?;

        // An unknown record is reported before an empty patch
        if patch.is_empty() {
            self.store
                .get(&patch.movie_id)
                .await?
                .ok_or(MovieError::NotFound)?;
            return Err(MovieError::validation("No fields provided for update"));
        }

        let update = patch.to_update_expression();
        self.store.update(&patch.movie_id, &update).await?;

        Ok(Reply::Updated)
    }

    async fn delete(&self, event: &InboundEvent) -> MovieResult<Reply> {
        let movie_id = match event.query_param(KEY_ATTRIBUTE) {
            Some(id) => id.to_string(),
            None => {
                let body = event.body_text()?;
                match body {
                    Some(body) => MoviePayload::parse(Some(&body))?
                        .movie_id()?
                        .map(str::to_string),
                    None => None,
                }
                .ok_or_else(|| MovieError::validation("movieId is required"))?
            }
        };

        self.store.delete(&movie_id).await?;

        Ok(Reply::Deleted { movie_id })
    }
}
