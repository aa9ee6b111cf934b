//! Find command implementation.
//!
//! Plain text search over task names and descriptions. The search text is
//! split into words and quoted phrases; a task matches when every term
//! appears in its name or description.

use taskq_filter::filter::{contains_ignore_case, DiagnosticMessage, Style, Tokenizer};
use taskq_model::prelude::*;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_found_json, format_found_table};

/// Options for the find command.
#[derive(Debug)]
pub struct FindOptions {
    /// Search text, one entry per command-line argument.
    pub text: Vec<String>,
    /// Include completed tasks.
    pub include_completed: bool,
}

/// A task that matched every search term.
#[derive(Debug)]
pub struct FoundTask<'a> {
    pub task: &'a Task,
    /// The name with matching terms marked as [`Style::Match`].
    pub name: DiagnosticMessage,
}

/// Executes the find command.
///
/// # Errors
///
/// Returns an error if the search text has an unterminated quote.
pub fn execute(ctx: &CommandContext, opts: &FindOptions, tasks: &TaskList) -> Result<()> {
    let terms = search_terms(&opts.text)?;
    let found = find_tasks(tasks, &terms, opts.include_completed);

    if ctx.json_output {
        let output = format_found_json(&terms, &found)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_found_table(&found, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Splits the search text into lower-cased terms.
pub fn search_terms(text: &[String]) -> Result<Vec<String>> {
    let source = text.join(" ");
    let tokens = Tokenizer::new(&source)
        .to_list()
        .map_err(|e| CommandError::query(source.as_str(), e))?;

    Ok(tokens
        .into_iter()
        .map(|token| token.text().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect())
}

/// Returns the tasks containing every term, in file order.
pub fn find_tasks<'a>(
    tasks: &'a TaskList,
    terms: &[String],
    include_completed: bool,
) -> Vec<FoundTask<'a>> {
    tasks
        .iter()
        .filter(|task| include_completed || !task.completed)
        .filter(|task| terms.iter().all(|term| contains_term(task, term)))
        .map(|task| FoundTask {
            task,
            name: highlight_terms(&task.name, terms),
        })
        .collect()
}

fn contains_term(task: &Task, term: &str) -> bool {
    contains_ignore_case(&task.name, term)
        || task
            .description
            .as_deref()
            .is_some_and(|description| contains_ignore_case(description, term))
}

/// Marks every occurrence of every term in `text`.
///
/// Each term is matched only against text no earlier term has claimed.
fn highlight_terms(text: &str, terms: &[String]) -> DiagnosticMessage {
    terms
        .iter()
        .fold(DiagnosticMessage::plain(text), |message, term| {
            message
                .segments()
                .iter()
                .fold(DiagnosticMessage::builder(), |builder, segment| {
                    if segment.style() == Style::Default {
                        builder.append(&DiagnosticMessage::highlight(segment.text(), term))
                    } else {
                        builder.styled(segment.style(), segment.text())
                    }
                })
                .build()
        })
}
