//! The filterable fields of a [`Task`].
//!
//! | field | aliases | kind | no operator means |
//! |-------|---------|------|-------------------|
//! | `name` | `n`, `title` | text, sets allowed | `>` |
//! | `description` | `desc` | text | `>` |
//! | `project` | `proj` | text | `>` |
//! | `tag` | `tags`, `t` | text set, sets allowed | `>` |
//! | `deadline` | `due` | date | `=` |
//! | `priority` | `pri` | number | operator required |

use std::sync::OnceLock;

use taskq_filter::filter::{FieldKind, FieldSpec, FieldValue, FilterOperator, Record, Schema};

use crate::models::{is_valid_tag, Task};

/// Canonical field names.
pub mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const PROJECT: &str = "project";
    pub const TAG: &str = "tag";
    pub const DEADLINE: &str = "deadline";
    pub const PRIORITY: &str = "priority";
}

static TASK_SCHEMA: OnceLock<Schema> = OnceLock::new();

/// The schema task queries are parsed against.
pub fn task_schema() -> &'static Schema {
    TASK_SCHEMA.get_or_init(build_task_schema)
}

fn build_task_schema() -> Schema {
    Schema::new()
        .with_field(
            FieldSpec::new(fields::NAME, FieldKind::Text)
                .with_alias("n")
                .with_alias("title")
                .set_filterable(true)
                .with_description("Task title"),
        )
        .with_field(
            FieldSpec::new(fields::DESCRIPTION, FieldKind::Text)
                .with_alias("desc")
                .with_description("Longer task description"),
        )
        .with_field(
            FieldSpec::new(fields::PROJECT, FieldKind::Text)
                .with_alias("proj")
                .with_description("Project the task belongs to"),
        )
        .with_field(
            FieldSpec::new(fields::TAG, FieldKind::TextSet)
                .with_alias("tags")
                .with_alias("t")
                .set_filterable(true)
                .with_validator(is_valid_tag, "tags use letters, digits, '-' or '_'")
                .with_description("Any of the task's tags"),
        )
        .with_field(
            FieldSpec::new(fields::DEADLINE, FieldKind::Date)
                .with_alias("due")
                .with_convenience(FilterOperator::Equal)
                .with_description("Due date: YYYY-MM-DD, today, tomorrow, yesterday or +Nd"),
        )
        .with_field(
            FieldSpec::new(fields::PRIORITY, FieldKind::Number)
                .with_alias("pri")
                .with_description("Priority from 1 (normal) to 4 (urgent)"),
        )
}

impl Record for Task {
    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            fields::NAME => Some(FieldValue::Text(&self.name)),
            fields::DESCRIPTION => self.description.as_deref().map(FieldValue::Text),
            fields::PROJECT => self.project.as_deref().map(FieldValue::Text),
            fields::TAG => Some(FieldValue::TextSet(&self.tags)),
            fields::DEADLINE => self.deadline.map(FieldValue::Date),
            fields::PRIORITY => Some(FieldValue::Number(i64::from(self.priority))),
            _ => None,
        }
    }
}
