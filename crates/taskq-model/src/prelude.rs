//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the taskq-model
//! crate together with the filter entry points needed to query tasks.

// Error types
pub use crate::error::{ModelError, ModelResult};

// Data models
pub use crate::models::{is_valid_tag, Task, TaskList};

// Task schema
pub use crate::schema::task_schema;

// Filter engine
pub use taskq_filter::filter::{
    parse, FilterError, FilterEvaluator, FilterParser, FilterResult, Predicate, Record, Schema,
};
