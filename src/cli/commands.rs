//! CLI command implementations
//!
//! Each command loads the configuration, builds the configured store and
//! runs the dispatcher behind one surface.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::config::{AppConfig, StoreBackend};
use crate::http_server::HttpServer;
use crate::movies::{Dispatcher, InboundEvent, ResponseEnvelope};
use crate::observability::Logger;
use crate::store::{InMemoryStore, RecordStore};

#[cfg(feature = "dynamodb")]
use crate::store::DynamoDbStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_event, write_envelope};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Invoke { config, event } => invoke(config.as_deref(), event.as_deref()),
        Command::Lambda { config } => lambda(config.as_deref()),
    }
}

/// Load, validate and apply the logging level
fn load_config(config_path: Option<&Path>) -> CliResult<AppConfig> {
    let config = AppConfig::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);

    let table_name = config.table_name.as_str();
    Logger::info(
        "MOVIES_CONFIG_LOADED",
        &[
            ("store", config.store.as_str()),
            ("table_name", table_name),
        ],
    );
    Ok(config)
}

fn runtime() -> CliResult<Runtime> {
    Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

#[cfg(feature = "dynamodb")]
async fn dynamodb_store(config: &AppConfig) -> DynamoDbStore {
    DynamoDbStore::from_env(config.table_name.as_str()).await
}

/// Serve `/movies` over HTTP until the process is stopped
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
        config.validate()?;
    }

    runtime()?.block_on(async {
        match config.store {
            StoreBackend::Memory => serve_with(InMemoryStore::new(), &config).await,
            #[cfg(feature = "dynamodb")]
            StoreBackend::DynamoDb => serve_with(dynamodb_store(&config).await, &config).await,
            #[cfg(not(feature = "dynamodb"))]
            StoreBackend::DynamoDb => Err(CliError::feature_disabled("dynamodb")),
        }
    })
}

async fn serve_with<S: RecordStore + 'static>(store: S, config: &AppConfig) -> CliResult<()> {
    let dispatcher = Dispatcher::from_config(store, config);
    HttpServer::with_config(dispatcher, config.http.clone())
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

/// Dispatch one event and print the envelope.
///
/// With the memory store every invocation starts from an empty table.
pub fn invoke(config_path: Option<&Path>, event_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let event = read_event(event_path)?;

    let envelope = runtime()?.block_on(async {
        match config.store {
            StoreBackend::Memory => Ok(invoke_with(InMemoryStore::new(), &config, event).await),
            #[cfg(feature = "dynamodb")]
            StoreBackend::DynamoDb => {
                Ok(invoke_with(dynamodb_store(&config).await, &config, event).await)
            }
            #[cfg(not(feature = "dynamodb"))]
            StoreBackend::DynamoDb => Err(CliError::feature_disabled("dynamodb")),
        }
    })?;

    write_envelope(&envelope)
}

/// Handle one event against `store` configured by `config`
pub async fn invoke_with<S: RecordStore>(
    store: S,
    config: &AppConfig,
    event: InboundEvent,
) -> ResponseEnvelope {
    Dispatcher::from_config(store, config).handle(event).await
}

/// Run the Lambda runtime loop
#[cfg(feature = "lambda")]
pub fn lambda(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;

    runtime()?.block_on(async {
        let result = match config.store {
            StoreBackend::Memory => {
                crate::lambda::run(Dispatcher::from_config(InMemoryStore::new(), &config)).await
            }
            #[cfg(feature = "dynamodb")]
            StoreBackend::DynamoDb => {
                let store = dynamodb_store(&config).await;
                crate::lambda::run(Dispatcher::from_config(store, &config)).await
            }
            #[cfg(not(feature = "dynamodb"))]
            StoreBackend::DynamoDb => return Err(CliError::feature_disabled("dynamodb")),
        };
        result.map_err(|e| CliError::boot_failed(format!("Lambda runtime failed: {}", e)))
    })
}

/// Run the Lambda runtime loop
#[cfg(not(feature = "lambda"))]
pub fn lambda(config_path: Option<&Path>) -> CliResult<()> {
    load_config(config_path)?;
    Err(CliError::feature_disabled("lambda"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invoke_with_memory_store() {
        let config = AppConfig::default();
        let event = InboundEvent::new("POST").with_body(
            json!({"title": "Heat", "genre": "Crime", "rating": 8.3}).to_string(),
        );

        let envelope = invoke_with(InMemoryStore::new(), &config, event).await;
        assert_eq!(envelope.status_code, 201);
        assert_eq!(
            envelope.body_json().unwrap()["message"],
            "Movie added successfully"
        );
    }

    #[tokio::test]
    async fn test_invoke_honours_expose_internal_errors() {
        let mut config = AppConfig::default();
        config.expose_internal_errors = true;

        let event = InboundEvent::new("PUT").with_body("not json");
        let envelope = invoke_with(InMemoryStore::new(), &config, event).await;
        assert_eq!(envelope.status_code, 500);

        let message = envelope.body_json().unwrap()["error"]
            .as_str()
            .unwrap()
            .to_string();
        assert_ne!(message, "Internal server error");
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let err = invoke(Some(Path::new("/nonexistent/movies.json")), None).unwrap_err();
        assert_eq!(err.code_str(), "MOVIES_CLI_CONFIG_ERROR");
    }
}
