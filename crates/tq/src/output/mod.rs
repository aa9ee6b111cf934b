//! Output formatting utilities for the tq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules:
//!
//! - [`tasks`] - Task output formatting (filter, find)
//! - [`fields`] - Schema listing
//! - [`tokens`] - Tokenizer output
//! - [`diagnostic`] - Styled messages and error reports
//! - [`helpers`] - Common formatting utilities (truncation, priority, deadlines)

pub mod diagnostic;
mod fields;
pub mod helpers;
mod tasks;
mod tokens;

pub use diagnostic::{error_json, format_error};
pub use fields::{format_fields_json, format_fields_table};
pub use tasks::{
    format_explanation, format_found_json, format_found_table, format_tasks_json,
    format_tasks_table,
};
pub use tokens::{format_tokens_json, format_tokens_table};
