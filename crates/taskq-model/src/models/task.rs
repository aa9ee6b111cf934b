//! Task model and task file loading.
//!
//! A task file is a JSON document of the form `{"tasks": [...]}`. Every task
//! is validated when the file is loaded, so a [`TaskList`] only ever holds
//! well-formed tasks.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::tag::is_valid_tag;
use crate::error::{ModelError, ModelResult};

/// Lowest valid priority.
pub const MIN_PRIORITY: i32 = 1;

/// Highest valid priority.
pub const MAX_PRIORITY: i32 = 4;

/// A task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The unique identifier for the task.
    pub id: String,

    /// The task title.
    pub name: String,

    /// A longer description of the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The project the task belongs to (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Tags attached to the task.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// The date the task is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Task priority from 1 (normal) to 4 (urgent).
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Whether the task is completed.
    #[serde(default)]
    pub completed: bool,

    /// When the task was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_priority() -> i32 {
    MIN_PRIORITY
}

impl Task {
    /// Creates an open task with normal priority and no other attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            project: None,
            tags: Vec::new(),
            deadline: None,
            priority: default_priority(),
            completed: false,
            created_at: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Replaces the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Checks the name, tags and priority.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName`, `InvalidTag` or `InvalidPriority`.
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName {
                id: self.id.clone(),
            });
        }
        if let Some(tag) = self.tags.iter().find(|tag| !is_valid_tag(tag)) {
            return Err(ModelError::InvalidTag {
                id: self.id.clone(),
                tag: tag.clone(),
            });
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(ModelError::InvalidPriority {
                id: self.id.clone(),
                priority: self.priority,
            });
        }
        Ok(())
    }
}

/// The contents of a task file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    /// The tasks, in file order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Creates a validated task list.
    ///
    /// # Errors
    ///
    /// See [`TaskList::validate`].
    pub fn new(tasks: Vec<Task>) -> ModelResult<Self> {
        let list = Self { tasks };
        list.validate()?;
        Ok(list)
    }

    /// Parses and validates a task list from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Json` for malformed JSON and the validation
    /// errors of [`TaskList::validate`].
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let list: TaskList = serde_json::from_str(json)?;
        list.validate()?;
        Ok(list)
    }

    /// Reads, parses and validates a task file.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ReadError` if the file cannot be read, otherwise
    /// the errors of [`TaskList::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ModelError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&contents)
    }

    /// Checks every task and that ids are unique.
    ///
    /// # Errors
    ///
    /// Returns the first task error found, or `DuplicateId`.
    pub fn validate(&self) -> ModelResult<()> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.id.as_str()) {
                return Err(ModelError::DuplicateId {
                    id: task.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates over all tasks.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Iterates over tasks that are not completed.
    pub fn open(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| !task.completed)
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
