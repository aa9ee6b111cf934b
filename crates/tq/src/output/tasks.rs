//! Task output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskq_model::prelude::{Predicate, Task};

use crate::commands::filter::FilterOutcome;
use crate::commands::find::FoundTask;

use super::diagnostic::render_message;
use super::helpers::{format_deadline, format_priority, format_tags, truncate_str};

const ID_WIDTH: usize = 8;
const PRIORITY_WIDTH: usize = 4;
const DEADLINE_WIDTH: usize = 12;
const PROJECT_WIDTH: usize = 15;
const TAGS_WIDTH: usize = 20;

/// JSON output structure for the filter command.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    /// The query in canonical form.
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub total: usize,
    pub tasks: Vec<TaskOutput<'a>>,
}

/// JSON output structure for the find command.
#[derive(Serialize)]
pub struct FindOutput<'a> {
    pub terms: &'a [String],
    pub tasks: Vec<TaskOutput<'a>>,
}

/// JSON output structure for a single task.
#[derive(Serialize)]
pub struct TaskOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub project: Option<&'a str>,
    pub tags: &'a [String],
    pub deadline: Option<String>,
    pub priority: i32,
    pub completed: bool,
}

impl<'a> From<&'a Task> for TaskOutput<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            name: &task.name,
            description: task.description.as_deref(),
            project: task.project.as_deref(),
            tags: &task.tags,
            deadline: task.deadline.map(|d| d.format("%Y-%m-%d").to_string()),
            priority: task.priority,
            completed: task.completed,
        }
    }
}

/// Formats filter results as JSON.
pub fn format_tasks_json(
    result: &FilterOutcome<'_>,
    explain: bool,
) -> Result<String, serde_json::Error> {
    let output = FilterOutput {
        query: result.predicate.to_string(),
        explanation: explain.then(|| result.predicate.describe().to_plain_text()),
        total: result.total,
        tasks: result.tasks.iter().map(|task| TaskOutput::from(*task)).collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats find results as JSON.
pub fn format_found_json(
    terms: &[String],
    found: &[FoundTask<'_>],
) -> Result<String, serde_json::Error> {
    let output = FindOutput {
        terms,
        tasks: found.iter().map(|f| TaskOutput::from(f.task)).collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats the canonical form and plain-words reading of a query.
pub fn format_explanation(predicate: &Predicate, use_colors: bool) -> String {
    let query_label = "Query:";
    let meaning_label = "Meaning:";
    let (query_label, meaning_label) = if use_colors {
        (
            query_label.bold().to_string(),
            meaning_label.bold().to_string(),
        )
    } else {
        (query_label.to_string(), meaning_label.to_string())
    };

    format!(
        "{} {}\n{} {}\n\n",
        query_label,
        predicate,
        meaning_label,
        render_message(&predicate.describe(), use_colors)
    )
}

/// Formats tasks as a table.
pub fn format_tasks_table(tasks: &[&Task], use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = header(
        &format!(
            "{:<ID_WIDTH$} {:<PRIORITY_WIDTH$} {:<DEADLINE_WIDTH$} {:<PROJECT_WIDTH$} {:<TAGS_WIDTH$} {}",
            "ID", "Pri", "Deadline", "Project", "Tags", "Name"
        ),
        use_colors,
    );

    for task in tasks {
        let project = task
            .project
            .as_deref()
            .map(|p| truncate_str(p, PROJECT_WIDTH))
            .unwrap_or_default();

        let line = format!(
            "{:<ID_WIDTH$} {} {} {:<PROJECT_WIDTH$} {:<TAGS_WIDTH$} {}",
            truncate_str(&task.id, ID_WIDTH),
            format_priority(task.priority, PRIORITY_WIDTH, use_colors),
            format_deadline(task.deadline, DEADLINE_WIDTH, use_colors),
            project,
            format_tags(&task.tags, TAGS_WIDTH),
            task.name
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Formats find results as a table, with matched terms highlighted.
pub fn format_found_table(found: &[FoundTask<'_>], use_colors: bool) -> String {
    if found.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = header(
        &format!(
            "{:<ID_WIDTH$} {:<PRIORITY_WIDTH$} {:<DEADLINE_WIDTH$} {}",
            "ID", "Pri", "Deadline", "Name"
        ),
        use_colors,
    );

    for f in found {
        let line = format!(
            "{:<ID_WIDTH$} {} {} {}",
            truncate_str(&f.task.id, ID_WIDTH),
            format_priority(f.task.priority, PRIORITY_WIDTH, use_colors),
            format_deadline(f.task.deadline, DEADLINE_WIDTH, use_colors),
            render_message(&f.name, use_colors)
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

fn header(text: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", text.dimmed())
    } else {
        format!("{text}\n")
    }
}
