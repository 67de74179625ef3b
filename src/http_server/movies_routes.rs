//! Movies HTTP Routes
//!
//! Converts axum requests into [`InboundEvent`]s and envelopes back into
//! responses. The dispatcher never sees axum types.
//!
//! Requests axum or tower-http reject before the dispatcher runs still
//! answer with a JSON envelope carrying the CORS headers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;

use crate::movies::{Dispatcher, EnvelopeBuilder, InboundEvent, ResponseEnvelope};
use crate::observability::Logger;
use crate::store::RecordStore;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// `/movies` with every method routed to the dispatcher
pub fn movies_routes<S>(dispatcher: Arc<Dispatcher<S>>, max_body_bytes: usize) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/movies", any(movies_handler::<S>))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::map_response(envelope_bare_rejection))
        .with_state(dispatcher)
}

async fn movies_handler<S: RecordStore>(
    State(dispatcher): State<Arc<Dispatcher<S>>>,
    method: Method,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    let event = inbound_event(&method, query, &headers, body);
    envelope_response(dispatcher.handle(event).await)
}

/// Envelope for a request rejected before dispatch
fn rejection_response(status: StatusCode, message: String) -> Response {
    let status_code = status.as_u16().to_string();
    Logger::warn(
        "MOVIES_HTTP_REJECTED",
        &[("status", status_code.as_str()), ("reason", message.as_str())],
    );
    envelope_response(EnvelopeBuilder::build(
        status.as_u16(),
        &json!({ "error": message }),
    ))
}

/// tower-http answers an oversized `Content-Length` with a bare 413
async fn envelope_bare_rejection(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE
        && !response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN)
    {
        return rejection_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large".to_string(),
        );
    }
    response
}

/// Build the event the trigger would have delivered for this request.
///
/// A body that is not UTF-8 is passed on base64-encoded, so the dispatcher
/// reports it like any other malformed body.
fn inbound_event(
    method: &Method,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: Bytes,
) -> InboundEvent {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let (body, is_base64_encoded) = match String::from_utf8(body.to_vec()) {
        Ok(text) => (text, false),
        Err(_) => (STANDARD.encode(&body), true),
    };

    InboundEvent {
        http_method: method.as_str().to_string(),
        query_string_parameters: (!query.is_empty()).then_some(query),
        headers: (!headers.is_empty()).then_some(headers),
        body: (!body.is_empty()).then_some(body),
        is_base64_encoded,
    }
}

/// Status, envelope headers and a JSON content type around the body
pub fn envelope_response(envelope: ResponseEnvelope) -> Response {
    let ResponseEnvelope {
        status_code,
        headers,
        body,
    } = envelope;

    let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, body).into_response();

    let response_headers = response.headers_mut();
    for (name, value) in &headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            response_headers.insert(name, value);
        }
    }
    response_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    response
}
