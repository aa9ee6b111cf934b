//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split into those that run on their own and those that need a
//! loaded task file. `main` resolves the task file only for the latter.

use taskq_model::prelude::TaskList;

use crate::cli::{Cli, Commands, ConfigCommands, Shell, SortField};
use crate::commands::config::Config;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without a task file.
pub trait StandaloneCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that query a task file.
pub trait TaskCommand {
    /// Execute the command against the loaded tasks.
    fn execute(&self, ctx: &CommandContext, tasks: &TaskList, config: &Config) -> Result<()>;
}

/// Commands that don't need a task file.
pub enum StandaloneDispatch<'a> {
    Fields,
    Tokens(&'a str),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs a task file.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Fields) => Some(Self::Fields),
            Some(Commands::Tokens { input }) => Some(Self::Tokens(input)),
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Fields => commands::fields::execute(ctx),
            Self::Tokens(input) => commands::tokens::execute(ctx, input),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("tq - query task files");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that query a task file.
pub enum TaskDispatch<'a> {
    Filter {
        query: &'a str,
        limit: Option<u32>,
        all: bool,
        include_completed: bool,
        sort: Option<SortField>,
        reverse: bool,
        explain: bool,
    },
    Find {
        text: &'a [String],
        include_completed: bool,
    },
}

impl<'a> TaskDispatch<'a> {
    /// Create a task dispatch from the CLI command.
    /// Returns None for commands handled by [`StandaloneDispatch`].
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Filter {
                query,
                limit,
                all,
                include_completed,
                sort,
                reverse,
                explain,
            }) => Some(Self::Filter {
                query,
                limit: *limit,
                all: *all,
                include_completed: *include_completed,
                sort: *sort,
                reverse: *reverse,
                explain: *explain,
            }),
            Some(Commands::Find {
                text,
                include_completed,
            }) => Some(Self::Find {
                text,
                include_completed: *include_completed,
            }),
            _ => None,
        }
    }
}

impl TaskCommand for TaskDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, tasks: &TaskList, config: &Config) -> Result<()> {
        match self {
            Self::Filter {
                query,
                limit,
                all,
                include_completed,
                sort,
                reverse,
                explain,
            } => {
                let opts = commands::filter::FilterOptions {
                    query: query.to_string(),
                    limit: limit.unwrap_or_else(|| config.limit()),
                    all: *all,
                    include_completed: *include_completed,
                    sort: *sort,
                    reverse: *reverse,
                    explain: *explain,
                };
                commands::filter::execute(ctx, &opts, tasks)
            }
            Self::Find {
                text,
                include_completed,
            } => {
                let opts = commands::find::FindOptions {
                    text: text.to_vec(),
                    include_completed: *include_completed,
                };
                commands::find::execute(ctx, &opts, tasks)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_standalone_commands() {
        for args in [
            vec!["tq"],
            vec!["tq", "fields"],
            vec!["tq", "tokens", "a b"],
            vec!["tq", "config"],
            vec!["tq", "completions", "bash"],
        ] {
            let cli = Cli::parse_from(args.clone());
            assert!(StandaloneDispatch::try_from_cli(&cli).is_some(), "{args:?}");
            assert!(TaskDispatch::from_cli(&cli).is_none(), "{args:?}");
        }
    }

    #[test]
    fn test_task_commands() {
        for args in [vec!["tq", "filter", "tag=x"], vec!["tq", "find", "milk"]] {
            let cli = Cli::parse_from(args.clone());
            assert!(StandaloneDispatch::try_from_cli(&cli).is_none(), "{args:?}");
            assert!(TaskDispatch::from_cli(&cli).is_some(), "{args:?}");
        }
    }

    #[test]
    fn test_filter_dispatch_carries_options() {
        let cli = Cli::parse_from(["tq", "filter", "pri>2", "--limit", "3", "--sort", "name"]);
        match TaskDispatch::from_cli(&cli) {
            Some(TaskDispatch::Filter {
                query, limit, sort, ..
            }) => {
                assert_eq!(query, "pri>2");
                assert_eq!(limit, Some(3));
                assert_eq!(sort, Some(SortField::Name));
            }
            _ => panic!("Expected Filter dispatch"),
        }
    }
}
