//! Filter command implementation.
//!
//! Parses a query against the task schema and lists the matching tasks.

use std::cmp::Ordering;

use taskq_model::prelude::*;

use super::{CommandContext, CommandError, Result};
use crate::cli::SortField;
use crate::output::{format_explanation, format_tasks_json, format_tasks_table};

/// Options for the filter command.
#[derive(Debug)]
pub struct FilterOptions {
    /// Filter expression.
    pub query: String,
    /// Limit results.
    pub limit: u32,
    /// Show all matches (no limit).
    pub all: bool,
    /// Include completed tasks.
    pub include_completed: bool,
    /// Sort field.
    pub sort: Option<SortField>,
    /// Reverse sort order.
    pub reverse: bool,
    /// Print the parsed query before the results.
    pub explain: bool,
}

/// The outcome of running a filter over a task list.
#[derive(Debug)]
pub struct FilterOutcome<'a> {
    /// The parsed query.
    pub predicate: Predicate,
    /// Number of tasks that matched before the limit was applied.
    pub total: usize,
    /// Matching tasks, sorted and limited.
    pub tasks: Vec<&'a Task>,
}

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if the query does not parse or output fails.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions, tasks: &TaskList) -> Result<()> {
    let result = run(opts, tasks)?;

    if ctx.json_output {
        let output = format_tasks_json(&result, opts.explain)?;
        println!("{output}");
    } else if !ctx.quiet {
        if opts.explain {
            print!("{}", format_explanation(&result.predicate, ctx.use_colors));
        }
        let output = format_tasks_table(&result.tasks, ctx.use_colors);
        print!("{output}");
        if result.tasks.len() < result.total {
            println!(
                "({} of {} matching tasks shown, use --all to see every match)",
                result.tasks.len(),
                result.total
            );
        }
    }

    Ok(())
}

/// Parses the query and selects, sorts and limits the matching tasks.
pub fn run<'a>(opts: &FilterOptions, tasks: &'a TaskList) -> Result<FilterOutcome<'a>> {
    let predicate = FilterParser::new(task_schema())
        .parse(&opts.query)
        .map_err(|e| CommandError::query(&opts.query, e))?;

    let evaluator = FilterEvaluator::new(&predicate);
    let matched: Vec<&Task> = tasks
        .iter()
        .filter(|task| opts.include_completed || !task.completed)
        .filter(|task| evaluator.matches(*task))
        .collect();
    let total = matched.len();
    tracing::debug!(query = %predicate, total, "filtered tasks");

    let matched = sort_tasks(matched, opts);
    let matched = apply_limit(matched, opts);

    Ok(FilterOutcome {
        predicate,
        total,
        tasks: matched,
    })
}

/// Sorts tasks based on the provided options.
fn sort_tasks<'a>(mut tasks: Vec<&'a Task>, opts: &FilterOptions) -> Vec<&'a Task> {
    if let Some(sort_field) = opts.sort {
        match sort_field {
            SortField::Deadline => {
                tasks.sort_by(|a, b| missing_last(a.deadline, b.deadline));
            }
            SortField::Priority => {
                // Urgent (4) first
                tasks.sort_by(|a, b| b.priority.cmp(&a.priority));
            }
            SortField::Name => {
                tasks.sort_by_key(|task| task.name.to_lowercase());
            }
            SortField::Created => {
                tasks.sort_by(|a, b| missing_last(a.created_at, b.created_at));
            }
        }
    }

    if opts.reverse {
        tasks.reverse();
    }

    tasks
}

/// Orders present values ascending, with missing values after them.
fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

/// Applies the limit to the task list.
fn apply_limit<'a>(tasks: Vec<&'a Task>, opts: &FilterOptions) -> Vec<&'a Task> {
    if opts.all {
        tasks
    } else {
        tasks.into_iter().take(opts.limit as usize).collect()
    }
}
