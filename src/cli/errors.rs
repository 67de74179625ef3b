//! CLI-specific error types
//!
//! All CLI errors are fatal: main prints them and exits non-zero.

use std::fmt;
use std::io;

use crate::config::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/event file)
    IoError,
    /// Runtime or server failed to start
    BootFailed,
    /// Command needs a cargo feature this build lacks
    FeatureDisabled,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "MOVIES_CLI_CONFIG_ERROR",
            Self::IoError => "MOVIES_CLI_IO_ERROR",
            Self::BootFailed => "MOVIES_CLI_BOOT_FAILED",
            Self::FeatureDisabled => "MOVIES_CLI_FEATURE_DISABLED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Missing cargo feature
    pub fn feature_disabled(feature: &str) -> Self {
        Self::new(
            CliErrorCode::FeatureDisabled,
            format!("This build does not include the '{}' feature", feature),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::feature_disabled("lambda");
        assert_eq!(err.code(), &CliErrorCode::FeatureDisabled);
        assert_eq!(
            err.to_string(),
            "MOVIES_CLI_FEATURE_DISABLED: This build does not include the 'lambda' feature"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::invalid("table_name must not be empty").into();
        assert_eq!(err.code_str(), "MOVIES_CLI_CONFIG_ERROR");
        assert!(err.message().contains("table_name"));
    }
}
