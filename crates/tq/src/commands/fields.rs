//! Fields command implementation.
//!
//! Lists the task fields a query can test.

use taskq_model::prelude::task_schema;

use super::{CommandContext, Result};
use crate::output::{format_fields_json, format_fields_table};

/// Executes the fields command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let schema = task_schema();

    if ctx.json_output {
        let output = format_fields_json(schema)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_fields_table(schema, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}
