//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// tq - Query task files with filter expressions
#[derive(Parser, Debug)]
#[command(name = "tq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Task file to query (default: tasks_file from config)
    #[arg(long, global = true, env = "TQ_TASKS", value_name = "FILE")]
    pub tasks: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks matching a filter expression
    #[command(alias = "f")]
    Filter {
        /// Filter expression (e.g., "tag=work && priority>2")
        query: String,

        /// Limit results (default: filter.limit from config, or 50)
        #[arg(long)]
        limit: Option<u32>,

        /// Show all matches (no limit)
        #[arg(long, conflicts_with = "limit")]
        all: bool,

        /// Include completed tasks
        #[arg(long)]
        include_completed: bool,

        /// Sort by field
        #[arg(long, value_enum)]
        sort: Option<SortField>,

        /// Reverse sort order
        #[arg(long)]
        reverse: bool,

        /// Explain how the query was understood
        #[arg(long)]
        explain: bool,
    },

    /// Find tasks whose name or description contains every term
    Find {
        /// Search terms (quote a phrase to keep its words together)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Include completed tasks
        #[arg(long)]
        include_completed: bool,
    },

    /// List the fields a query can test
    Fields,

    /// Show how an input string splits into words and phrases
    Tokens {
        /// Input to tokenize
        input: String,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Sort fields for the filter command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Deadline,
    Priority,
    Name,
    Created,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
