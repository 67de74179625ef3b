//! # Inbound Events
//!
//! The HTTP-trigger event shape (API Gateway proxy integration) and the
//! method routing table.

use std::collections::HashMap;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::errors::{MovieError, MovieResult};

/// One inbound request. Unknown event fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default)]
    pub http_method: String,

    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,

    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    #[serde(default)]
    pub body: Option<String>,

    /// Set by the trigger when `body` carries base64 rather than text
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InboundEvent {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Non-empty query parameter value
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()?
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Body as text, decoding base64 when flagged. Blank bodies are `None`.
    pub fn body_text(&self) -> MovieResult<Option<String>> {
        let Some(body) = self.body.as_deref() else {
            return Ok(None);
        };

        let text = if self.is_base64_encoded {
            let bytes = STANDARD
                .decode(body.trim())
                .map_err(|e| MovieError::MalformedBody(format!("invalid base64: {}", e)))?;
            String::from_utf8(bytes)
                .map_err(|e| MovieError::MalformedBody(format!("invalid UTF-8: {}", e)))?
        } else {
            body.to_string()
        };

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

/// Supported methods. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Options,
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = MovieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPTIONS" => Ok(HttpMethod::Options),
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(MovieError::validation("Invalid request method")),
        }
    }
}
