//! # Identity Extraction
//!
//! Best-effort display name from an `Authorization: Bearer <token>` header.
//!
//! ## Invariants
//! - In `unverified` mode the token signature is NOT checked. The extracted
//!   name is display metadata attached to records, never an authorization
//!   input.
//! - In `verified` mode an HS256 signature, issuer and audience are checked
//!   first; a token that fails is treated as no identity.
//! - Extraction never fails a request: every failure yields [`ANONYMOUS`].

use std::collections::HashMap;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// Display name used when no usable claim is present
pub const ANONYMOUS: &str = "anonymous";

/// Claims read from the token payload; everything else is ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayClaims {
    #[serde(default)]
    pub preferred_username: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl DisplayClaims {
    /// `preferred_username`, falling back to `name`
    pub fn display_name(&self) -> Option<&str> {
        [&self.preferred_username, &self.name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
    }
}

/// How bearer tokens are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// No identity is extracted and nothing is attached to records
    Disabled,
    /// Claims are decoded without signature verification
    #[default]
    Unverified,
    /// Claims are trusted only after HS256 verification
    Verified,
}

/// Identity configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub mode: IdentityMode,

    /// Shared HS256 secret (verified mode)
    #[serde(default)]
    pub secret: Option<String>,

    /// Expected `iss` claim (verified mode, optional)
    #[serde(default)]
    pub issuer: Option<String>,

    /// Expected `aud` claim (verified mode, optional)
    #[serde(default)]
    pub audience: Option<String>,
}

/// Extracts a display name from request headers
#[derive(Clone)]
pub struct IdentityExtractor {
    mode: IdentityMode,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityExtractor {
    pub fn new(config: &IdentityConfig) -> Self {
        match config.mode {
            IdentityMode::Verified => {
                let secret = config.secret.as_deref().unwrap_or_default();
                let mut validation = Validation::new(Algorithm::HS256);
                if let Some(issuer) = &config.issuer {
                    validation.set_issuer(&[issuer]);
                }
                match &config.audience {
                    Some(audience) => validation.set_audience(&[audience]),
                    None => validation.validate_aud = false,
                }

                Self {
                    mode: IdentityMode::Verified,
                    decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                    validation,
                }
            }
            mode => {
                let mut validation = Validation::new(Algorithm::HS256);
                validation.insecure_disable_signature_validation();
                validation.validate_exp = false;
                validation.validate_aud = false;
                validation.required_spec_claims.clear();

                Self {
                    mode,
                    decoding_key: DecodingKey::from_secret(&[]),
                    validation,
                }
            }
        }
    }

    /// Extractor that never attaches an identity
    pub fn disabled() -> Self {
        Self::new(&IdentityConfig {
            mode: IdentityMode::Disabled,
            ..IdentityConfig::default()
        })
    }

    /// Extractor that reads claims without verification
    pub fn unverified() -> Self {
        Self::new(&IdentityConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.mode != IdentityMode::Disabled
    }

    /// Find the bearer token in `headers`. Header names are matched
    /// case-insensitively and the scheme is split off on whitespace.
    pub fn bearer_token(headers: &HashMap<String, String>) -> Option<&str> {
        let value = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .map(|(_, v)| v.as_str())?;

        let mut parts = value.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
            _ => None,
        }
    }

    /// Decode the token claims according to the configured mode
    pub fn decode_claims(&self, token: &str) -> AuthResult<DisplayClaims> {
        let token_data = decode::<DisplayClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidClaims,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }

    /// Display name for the caller, or `None` when identity is disabled.
    ///
    /// Missing headers, a missing or malformed token, and a failed
    /// verification all resolve to [`ANONYMOUS`].
    pub fn display_name(&self, headers: Option<&HashMap<String, String>>) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let name = headers
            .and_then(Self::bearer_token)
            .and_then(|token| self.decode_claims(token).ok())
            .and_then(|claims| claims.display_name().map(str::to_string))
            .unwrap_or_else(|| ANONYMOUS.to_string());
        Some(name)
    }
}

impl std::fmt::Debug for IdentityExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityExtractor")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
