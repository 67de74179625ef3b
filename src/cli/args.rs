//! CLI argument definitions using clap
//!
//! Commands:
//! - movies-api serve [--config <path>] [--port <n>]
//! - movies-api invoke [--config <path>] [--event <path>]
//! - movies-api lambda [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Movies API - CRUD handler for HTTP-trigger events
#[derive(Parser, Debug)]
#[command(name = "movies-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve /movies over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to bind, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Handle one inbound event and print the response envelope
    Invoke {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Event JSON file (default: stdin)
        #[arg(long)]
        event: Option<PathBuf>,
    },

    /// Run the AWS Lambda runtime loop
    Lambda {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
