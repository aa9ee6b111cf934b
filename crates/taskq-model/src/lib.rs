//! Task records for the taskq filter engine.
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use taskq_model::prelude::*;
//!
//! let tasks = TaskList::from_json_str(
//!     r#"{"tasks": [{"id": "1", "name": "Plan trip", "tags": ["world"], "priority": 3}]}"#,
//! )
//! .unwrap();
//!
//! let predicate = parse("tag>wo && priority<4", task_schema()).unwrap();
//! assert!(predicate.evaluate(&tasks.tasks[0]));
//! ```
//!
//! This re-exports the task types, error types and the filter entry points.

pub mod error;
pub mod models;
pub mod prelude;
pub mod schema;
