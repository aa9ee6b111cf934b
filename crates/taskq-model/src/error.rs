//! Error types for task records and task files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating tasks.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A task has an empty or blank name.
    #[error("task '{id}' has an empty name")]
    EmptyName {
        /// The offending task.
        id: String,
    },

    /// A task carries a tag that breaks the tag syntax.
    #[error("task '{id}' has an invalid tag '{tag}': use letters, digits, '-' or '_'")]
    InvalidTag {
        /// The offending task.
        id: String,
        /// The rejected tag.
        tag: String,
    },

    /// A task priority outside 1..=4.
    #[error("task '{id}' has priority {priority}; expected 1 to 4")]
    InvalidPriority {
        /// The offending task.
        id: String,
        /// The rejected priority.
        priority: i32,
    },

    /// Two tasks in one file share an id.
    #[error("duplicate task id '{id}'")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// I/O error while reading a task file.
    #[error("failed to read task file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The task file is not valid JSON for a task list.
    #[error("invalid task file: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ModelError::ReadError { .. } => 3,
            _ => 4,
        }
    }
}

/// Result type for task model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_task() {
        let err = ModelError::InvalidPriority {
            id: "7".to_string(),
            priority: 9,
        };
        assert_eq!(err.to_string(), "task '7' has priority 9; expected 1 to 4");

        let err = ModelError::InvalidTag {
            id: "7".to_string(),
            tag: "two words".to_string(),
        };
        assert!(err.to_string().contains("'two words'"));
    }

    #[test]
    fn test_exit_codes() {
        let read = ModelError::ReadError {
            path: PathBuf::from("/missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(read.exit_code(), 3);
        assert!(std::error::Error::source(&read).is_some());

        let empty = ModelError::EmptyName { id: "1".to_string() };
        assert_eq!(empty.exit_code(), 4);
    }
}
