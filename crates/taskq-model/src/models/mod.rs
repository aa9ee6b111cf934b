//! Task data types.

mod tag;
mod task;

pub use tag::is_valid_tag;
pub use task::{Task, TaskList, MAX_PRIORITY, MIN_PRIORITY};
