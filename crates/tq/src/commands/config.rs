//! `tq config`: the settings file.
//!
//! Settings live in `config.toml` under `$XDG_CONFIG_HOME/tq` (or
//! `~/.config/tq`). `TQ_CONFIG` names the file directly.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use directories::BaseDirs;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Schema version written to new files.
const CONFIG_VERSION: u32 = 1;

/// `tq filter` row limit when neither `--limit` nor `filter.limit` is set.
pub const DEFAULT_LIMIT: u32 = 50;

/// Keys accepted by `tq config set`.
const KEYS: &str = "tasks_file, output.color, filter.limit";

/// Contents of `config.toml`. Absent keys take their defaults.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,

    /// Task file used when `--tasks` and `TQ_TASKS` are absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks_file: Option<PathBuf>,

    pub output: OutputConfig,

    pub filter: FilterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tasks_file: None,
            output: OutputConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl Config {
    /// Row limit for `tq filter` without `--limit`.
    pub fn limit(&self) -> u32 {
        self.filter.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// `[output]` table.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `false` turns colored output off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// `[filter]` table.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

fn config_error(action: &str, e: impl std::fmt::Display) -> CommandError {
    CommandError::Config(format!("Failed to {action} config: {e}"))
}

/// Resolves the settings file: `TQ_CONFIG`, then `$XDG_CONFIG_HOME/tq`,
/// then `~/.config/tq`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os("TQ_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let dir = match env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config"))
            .ok_or_else(|| CommandError::Config("No home directory to keep config in".into()))?,
    };
    Ok(dir.join("tq").join("config.toml"))
}

/// Reads the settings file, or the defaults when there is none.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(config_error("read", e)),
    };

    let config: Config = toml::from_str(&content).map_err(|e| config_error("parse", e))?;
    tracing::debug!(path = %path.display(), version = config.version, "loaded config");
    migrate_config(config)
}

/// Brings an older file up to [`CONFIG_VERSION`].
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        tracing::warn!(
            version = config.version,
            supported = CONFIG_VERSION,
            "config file is newer than this tq; unknown settings are ignored"
        );
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| config_error("create directory for", e))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| config_error("serialize", e))?;
    fs::write(&path, content).map_err(|e| config_error("write", e))
}

/// The settings that are set, as `(key, value)` pairs in `tq config set` form.
fn settings(config: &Config) -> Vec<(&'static str, String)> {
    let mut settings = Vec::new();
    if let Some(path) = &config.tasks_file {
        settings.push(("tasks_file", path.display().to_string()));
    }
    if let Some(color) = config.output.color {
        settings.push(("output.color", color.to_string()));
    }
    if let Some(limit) = config.filter.limit {
        settings.push(("filter.limit", limit.to_string()));
    }
    settings
}

/// `tq config show`.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = config_path()?;
    let config = load_config()?;
    let exists = path.exists();

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": exists,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    let location = path.display().to_string();
    if ctx.use_colors {
        println!("{}", location.bold());
    } else {
        println!("{location}");
    }

    let settings = settings(&config);
    if !exists {
        println!("  (no file yet; 'tq config set <KEY> <VALUE>' creates it)");
    } else if settings.is_empty() {
        println!("  (nothing set)");
    }
    for (key, value) in settings {
        if ctx.use_colors {
            println!("  {} = {}", key.cyan(), value);
        } else {
            println!("  {key} = {value}");
        }
    }
    println!("  effective filter limit: {}", config.limit());

    Ok(())
}

/// Arguments of `tq config set`.
pub struct ConfigSetOptions {
    pub key: String,
    pub value: String,
}

/// `tq config set`.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;
    tracing::debug!(key = %opts.key, value = %opts.value, "saved setting");

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": config_path()?.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{} = {}", opts.key, opts.value);
    }

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "tasks_file" if value.trim().is_empty() => Err(CommandError::Config(
            "tasks_file needs a path".to_string(),
        )),
        "tasks_file" => {
            config.tasks_file = Some(PathBuf::from(value));
            Ok(())
        }
        "output.color" => {
            config.output.color = Some(parse_bool(value)?);
            Ok(())
        }
        "filter.limit" => match value.parse::<u32>() {
            Ok(limit) if limit > 0 => {
                config.filter.limit = Some(limit);
                Ok(())
            }
            _ => Err(CommandError::Config(format!(
                "filter.limit must be a positive whole number, got '{value}'"
            ))),
        },
        _ => Err(CommandError::Config(format!(
            "Unknown config key '{key}'. Known keys: {KEYS}"
        ))),
    }
}

/// `tq config path`.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Accepts true/false, yes/no, on/off and 1/0 in any case.
fn parse_bool(value: &str) -> Result<bool> {
    const TRUE: [&str; 4] = ["true", "yes", "on", "1"];
    const FALSE: [&str; 4] = ["false", "no", "off", "0"];

    let lowered = value.to_ascii_lowercase();
    if TRUE.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(CommandError::Config(format!(
            "'{value}' is not a boolean (true/false, yes/no, on/off, 1/0)"
        )))
    }
}
