//! JSON I/O handling for CLI
//!
//! - Input: one inbound event object, from a file or stdin
//! - Output: one response envelope object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::movies::{InboundEvent, ResponseEnvelope};

use super::errors::{CliError, CliResult};

/// Read an inbound event from `path`, or stdin when absent
pub fn read_event(path: Option<&Path>) -> CliResult<InboundEvent> {
    let input = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read event {}: {}", path.display(), e))
        })?,
        None => {
            let mut input = String::new();
            io::stdin().lock().read_to_string(&mut input)?;
            input
        }
    };

    parse_event(&input)
}

/// Parse event JSON
pub fn parse_event(input: &str) -> CliResult<InboundEvent> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(input)?)
}

/// Write the envelope to stdout as one JSON line
pub fn write_envelope(envelope: &ResponseEnvelope) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, envelope)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_event() {
        let event = parse_event(r#"{"httpMethod": "DELETE", "body": "{\"movieId\":\"m-1\"}"}"#)
            .unwrap();
        assert_eq!(event.http_method, "DELETE");
        assert!(event.body.is_some());
    }

    #[test]
    fn test_parse_event_rejects_empty() {
        assert!(parse_event("  \n").is_err());
        assert!(parse_event("[]").is_err());
    }

    #[test]
    fn test_read_event_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"httpMethod": "OPTIONS"}"#).unwrap();

        let event = read_event(Some(file.path())).unwrap();
        assert_eq!(event.http_method, "OPTIONS");
    }

    #[test]
    fn test_read_event_missing_file() {
        let err = read_event(Some(Path::new("/nonexistent/event.json"))).unwrap_err();
        assert_eq!(err.code_str(), "MOVIES_CLI_IO_ERROR");
    }
}
