//! Command implementations for the tq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod fields;
pub mod filter;
pub mod find;
pub mod tokens;

use std::env;

use taskq_filter::filter::FilterError;
use taskq_model::error::ModelError;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The query or search text could not be parsed.
    #[error("invalid query: {source}")]
    Query {
        /// The text that failed to parse.
        query: String,
        /// The parse error.
        #[source]
        source: FilterError,
    },

    /// Task file error.
    #[error("{0}")]
    Model(#[from] ModelError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Wraps a parse error together with the text it was raised for.
    pub fn query(query: impl Into<String>, source: impl Into<FilterError>) -> Self {
        CommandError::Query {
            query: query.into(),
            source: source.into(),
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are off with `--no-color` or when `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
        }
    }

    /// Applies config file preferences. Flags win over the config.
    pub fn with_config(mut self, config: &Config) -> Self {
        if config.output.color == Some(false) {
            self.use_colors = false;
        }
        self
    }
}
