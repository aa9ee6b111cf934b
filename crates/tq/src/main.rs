use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use dispatch::{StandaloneCommand, StandaloneDispatch, TaskCommand, TaskDispatch};
use taskq_model::prelude::TaskList;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = output::error_json(&e, error_code(&e));
                eprintln!("{error_json:#}");
            } else {
                let use_colors = CommandContext::from_cli(&cli).use_colors;
                eprintln!("{}", output::format_error(&e, use_colors));
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` logs at debug, `--quiet` at error
/// and the default is warn.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    // Commands that need no task file (fields, tokens, config, completions, help)
    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let Some(dispatch) = TaskDispatch::from_cli(cli) else {
        return Ok(());
    };

    let config = load_config()?;
    let ctx = ctx.with_config(&config);
    let path = resolve_tasks_path(cli, &config)?;
    tracing::debug!(path = %path.display(), "loading tasks");
    let tasks = TaskList::load(&path)?;

    dispatch.execute(&ctx, &tasks, &config)
}

/// Resolves the task file with priority: flag/env > config.
///
/// `--tasks` and `TQ_TASKS` both arrive through `cli.tasks`.
fn resolve_tasks_path(cli: &Cli, config: &Config) -> commands::Result<PathBuf> {
    cli.tasks
        .clone()
        .or_else(|| config.tasks_file.clone())
        .ok_or_else(|| {
            CommandError::Config(
                "No task file given. Use --tasks <FILE>, set TQ_TASKS, or run \
                 'tq config set tasks_file <FILE>'"
                    .to_string(),
            )
        })
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Query { source, .. } => source.kind().code(),
        CommandError::Model(_) => "TASK_FILE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

/// Returns the numeric exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Query { .. } => 1,
        CommandError::Model(err) => u8::try_from(err.exit_code()).unwrap_or(1),
        CommandError::Io(_) => 3,
        CommandError::Config(_) => 5,
        CommandError::Json(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskq_model::error::ModelError;

    fn cli_with_tasks(tasks: Option<&str>) -> Cli {
        Cli {
            verbose: false,
            quiet: false,
            json: false,
            no_color: false,
            tasks: tasks.map(PathBuf::from),
            command: Some(cli::Commands::Fields),
        }
    }

    #[test]
    fn test_resolve_tasks_path_from_flag() {
        let mut config = Config::default();
        config.tasks_file = Some(PathBuf::from("config.json"));

        let path = resolve_tasks_path(&cli_with_tasks(Some("flag.json")), &config).unwrap();
        assert_eq!(path, PathBuf::from("flag.json"));
    }

    #[test]
    fn test_resolve_tasks_path_from_config() {
        let mut config = Config::default();
        config.tasks_file = Some(PathBuf::from("config.json"));

        let path = resolve_tasks_path(&cli_with_tasks(None), &config).unwrap();
        assert_eq!(path, PathBuf::from("config.json"));
    }

    #[test]
    fn test_resolve_tasks_path_missing() {
        let err = resolve_tasks_path(&cli_with_tasks(None), &Config::default()).unwrap_err();
        assert!(matches!(err, CommandError::Config(ref msg) if msg.contains("--tasks")));
        assert_eq!(exit_status(&err), 5);
    }

    #[test]
    fn test_error_codes() {
        let model = CommandError::Model(ModelError::DuplicateId { id: "1".into() });
        assert_eq!(error_code(&model), "TASK_FILE_ERROR");
        assert_eq!(exit_status(&model), 4);

        let read = CommandError::Model(ModelError::ReadError {
            path: PathBuf::from("/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        });
        assert_eq!(exit_status(&read), 3);

        let query = CommandError::query(
            "priorty<2",
            taskq_model::prelude::parse("priorty<2", taskq_model::prelude::task_schema())
                .unwrap_err(),
        );
        assert_eq!(error_code(&query), "INVALID_KEY");
        assert_eq!(exit_status(&query), 1);
    }
}
