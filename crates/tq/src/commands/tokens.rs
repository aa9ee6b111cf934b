//! Tokens command implementation.
//!
//! Shows how an input splits into words and quoted phrases, with byte offsets.

use taskq_filter::filter::Tokenizer;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_tokens_json, format_tokens_table};

/// Executes the tokens command.
///
/// # Errors
///
/// Returns an error if the input has an unterminated quote.
pub fn execute(ctx: &CommandContext, input: &str) -> Result<()> {
    let tokens = Tokenizer::new(input)
        .to_list()
        .map_err(|e| CommandError::query(input, e))?;

    if ctx.json_output {
        let output = format_tokens_json(&tokens)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_tokens_table(&tokens, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}
