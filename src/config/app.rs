//! Application configuration structure

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::{IdentityConfig, IdentityMode};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

use super::errors::{ConfigError, ConfigResult};

pub const DEFAULT_TABLE_NAME: &str = "MoviesTable";

const TABLE_ENV: &str = "MOVIES_TABLE";
const STORE_ENV: &str = "MOVIES_STORE";
const IDENTITY_SECRET_ENV: &str = "MOVIES_IDENTITY_SECRET";

/// Which record store backs the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local table, lost on exit
    #[default]
    Memory,
    /// DynamoDB table named by `table_name`
    #[serde(rename = "dynamodb")]
    DynamoDb,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::DynamoDb => "dynamodb",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StoreBackend::Memory),
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            other => Err(ConfigError::invalid(format!(
                "unknown store '{}', expected 'memory' or 'dynamodb'",
                other
            ))),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table holding movie records (default: "MoviesTable")
    #[serde(default = "default_table_name")]
    pub table_name: String,

    #[serde(default)]
    pub store: StoreBackend,

    #[serde(default)]
    pub identity: IdentityConfig,

    /// Return fault detail in 500 bodies instead of a generic message
    #[serde(default)]
    pub expose_internal_errors: bool,

    /// Minimum logged severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            store: StoreBackend::default(),
            identity: IdentityConfig::default(),
            expose_internal_errors: false,
            log_level: default_log_level(),
            http: HttpServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without overrides or validation
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(table_name) = var(TABLE_ENV) {
            self.table_name = table_name;
        }
        if let Some(store) = var(STORE_ENV) {
            self.store = store.parse()?;
        }
        if let Some(secret) = var(IDENTITY_SECRET_ENV) {
            self.identity.secret = Some(secret);
        }
        Ok(())
    }

    /// Check field constraints
    pub fn validate(&self) -> ConfigResult<()> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::invalid("table_name must not be empty"));
        }

        if self.http.port == 0 {
            return Err(ConfigError::invalid("http.port must be > 0"));
        }

        if self.http.max_body_bytes == 0 {
            return Err(ConfigError::invalid("http.max_body_bytes must be > 0"));
        }

        if self.identity.mode == IdentityMode::Verified
            && self.identity.secret.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::invalid(
                "identity.secret is required when identity.mode is 'verified'",
            ));
        }

        if self.store == StoreBackend::DynamoDb && !cfg!(feature = "dynamodb") {
            return Err(ConfigError::invalid(
                "store 'dynamodb' requires building with the 'dynamodb' feature",
            ));
        }

        self.log_severity()?;

        Ok(())
    }

    pub fn log_severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }
}
