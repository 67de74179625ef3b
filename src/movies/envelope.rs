//! # Response Envelopes
//!
//! Every outcome, success or error, leaves through [`EnvelopeBuilder`], so
//! the cross-origin header policy is applied in exactly one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::codec::{encode_item, encode_items, Item};
use crate::store::KEY_ATTRIBUTE;

use super::errors::MovieError;

/// Fixed cross-origin headers attached to every envelope
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "OPTIONS,GET,POST,PUT,DELETE"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Outbound response in the HTTP-trigger shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON
    pub body: String,
}

impl ResponseEnvelope {
    /// Parse the body back into JSON
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Successful handler results
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// CORS preflight
    Preflight,
    /// Full scan
    Movies(Vec<Item>),
    /// Raw record
    Movie(Item),
    Created { movie_id: String },
    Updated,
    Deleted { movie_id: String },
}

impl Reply {
    pub fn status_code(&self) -> u16 {
        match self {
            Reply::Created { .. } => 201,
            _ => 200,
        }
    }

    /// JSON body, with every stored decimal rendered as a float
    pub fn body(&self) -> Value {
        match self {
            Reply::Preflight => json!({"message": "CORS preflight success"}),
            Reply::Movies(items) => json!({"movies": encode_items(items)}),
            Reply::Movie(item) => encode_item(item),
            Reply::Created { movie_id } => json!({
                "message": "Movie added successfully",
                KEY_ATTRIBUTE: movie_id,
            }),
            Reply::Updated => json!({"message": "Movie updated successfully"}),
            Reply::Deleted { movie_id } => json!({
                "message": format!("Movie with ID {} deleted successfully", movie_id),
            }),
        }
    }
}

/// Builds envelopes for replies and errors
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeBuilder {
    expose_internal_errors: bool,
}

impl EnvelopeBuilder {
    pub fn new(expose_internal_errors: bool) -> Self {
        Self {
            expose_internal_errors,
        }
    }

    pub fn reply(&self, reply: &Reply) -> ResponseEnvelope {
        Self::build(reply.status_code(), &reply.body())
    }

    pub fn error(&self, err: &MovieError) -> ResponseEnvelope {
        Self::build(
            err.status_code(),
            &json!({"error": err.public_message(self.expose_internal_errors)}),
        )
    }

    /// Wrap a status and JSON body with the fixed headers
    pub fn build(status_code: u16, body: &Value) -> ResponseEnvelope {
        ResponseEnvelope {
            status_code,
            headers: CORS_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Attribute;
    use crate::store::StoreError;
    use rust_decimal::Decimal;

    fn item(id: &str, rating: Decimal) -> Item {
        let mut item = Item::new();
        item.insert(KEY_ATTRIBUTE.to_string(), Attribute::from(id));
        item.insert("rating".to_string(), Attribute::Number(rating));
        item
    }

    #[test]
    fn test_headers_on_every_envelope() {
        let builder = EnvelopeBuilder::default();
        let envelopes = [
            builder.reply(&Reply::Preflight),
            builder.reply(&Reply::Updated),
            builder.error(&MovieError::NotFound),
            builder.error(&MovieError::MalformedBody("eof".to_string())),
        ];

        for envelope in envelopes {
            assert_eq!(envelope.headers.len(), 3);
            assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
            assert_eq!(
                envelope.headers["Access-Control-Allow-Methods"],
                "OPTIONS,GET,POST,PUT,DELETE"
            );
            assert_eq!(envelope.headers["Access-Control-Allow-Headers"], "Content-Type");
        }
    }

    #[test]
    fn test_created_body() {
        let envelope = EnvelopeBuilder::default().reply(&Reply::Created {
            movie_id: "m-1".to_string(),
        });
        assert_eq!(envelope.status_code, 201);

        let body = envelope.body_json().unwrap();
        assert_eq!(body["message"], "Movie added successfully");
        assert_eq!(body["movieId"], "m-1");
    }

    #[test]
    fn test_list_body_renders_floats() {
        let reply = Reply::Movies(vec![item("m-1", Decimal::new(75, 1))]);
        let body = EnvelopeBuilder::default().reply(&reply).body_json().unwrap();
        assert_eq!(body["movies"][0]["rating"], json!(7.5));
        assert_eq!(body["movies"][0]["movieId"], "m-1");
    }

    #[test]
    fn test_deleted_message_names_id() {
        let body = Reply::Deleted {
            movie_id: "m-9".to_string(),
        }
        .body();
        assert_eq!(body["message"], "Movie with ID m-9 deleted successfully");
    }

    #[test]
    fn test_error_envelopes() {
        let builder = EnvelopeBuilder::default();

        let envelope = builder.error(&MovieError::validation("movieId is required"));
        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.body_json().unwrap()["error"], "movieId is required");

        let fault = MovieError::Store(StoreError::Backend("socket closed".to_string()));
        let envelope = builder.error(&fault);
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.body_json().unwrap()["error"], "Internal server error");

        let verbose = EnvelopeBuilder::new(true).error(&fault);
        assert_eq!(
            verbose.body_json().unwrap()["error"],
            "Store backend error: socket closed"
        );
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = EnvelopeBuilder::default().reply(&Reply::Updated);
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["statusCode"], 200);
        assert!(wire["headers"].is_object());
        assert!(wire["body"].is_string());
    }
}
