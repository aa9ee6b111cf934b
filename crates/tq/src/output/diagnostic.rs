//! Terminal rendering of styled messages and errors.

use owo_colors::OwoColorize;
use serde_json::{json, Value};
use taskq_filter::filter::{DiagnosticMessage, Style};

use crate::commands::CommandError;

/// Applies the terminal color for a segment style.
pub fn paint(text: &str, style: Style) -> String {
    match style {
        Style::Default => text.to_string(),
        Style::Error => text.red().bold().to_string(),
        Style::Field => text.cyan().to_string(),
        Style::Operator => text.magenta().to_string(),
        Style::Phrase => text.yellow().to_string(),
        Style::Position => text.bold().to_string(),
        Style::Hint => text.green().to_string(),
        Style::Match => text.black().on_yellow().to_string(),
    }
}

/// Renders a message, with colors when enabled.
pub fn render_message(message: &DiagnosticMessage, use_colors: bool) -> String {
    if !use_colors {
        return message.to_plain_text();
    }
    message
        .segments()
        .iter()
        .map(|segment| paint(segment.text(), segment.style()))
        .collect()
}

/// Places a caret under byte offset `position` of `query`.
pub fn caret_line(query: &str, position: usize) -> String {
    let column = query
        .get(..position)
        .map_or_else(|| query.chars().count(), |prefix| prefix.chars().count());
    format!("{}^", " ".repeat(column))
}

/// Formats an error for stderr.
///
/// Query errors show the query with a caret under the offending position.
pub fn format_error(err: &CommandError, use_colors: bool) -> String {
    match err {
        CommandError::Query { query, source } => {
            let label = if use_colors {
                "Error:".red().bold().to_string()
            } else {
                "Error:".to_string()
            };
            let caret = caret_line(query, source.position());
            let caret = if use_colors {
                caret.red().bold().to_string()
            } else {
                caret
            };
            format!(
                "{} {}\n  {}\n  {}",
                label,
                render_message(source.message(), use_colors),
                query,
                caret
            )
        }
        other => format!("Error: {other}"),
    }
}

/// Builds the `{"error": {...}}` document for `--json` mode.
pub fn error_json(err: &CommandError, code: &str) -> Value {
    match err {
        CommandError::Query { query, source } => json!({
            "error": {
                "code": source.kind().code(),
                "message": source.to_string(),
                "query": query,
                "position": source.position(),
                "segments": source.message(),
            }
        }),
        other => json!({
            "error": {
                "code": code,
                "message": other.to_string(),
            }
        }),
    }
}
