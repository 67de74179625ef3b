//! CLI module for the movies handler
//!
//! Provides command-line interface for:
//! - serve: Local HTTP server on /movies
//! - invoke: One-shot event dispatch, envelope on stdout
//! - lambda: AWS Lambda runtime loop

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{invoke, invoke_with, lambda, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_event, read_event, write_envelope};
