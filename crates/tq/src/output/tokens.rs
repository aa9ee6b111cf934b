//! Token output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskq_filter::filter::Token;

/// JSON output structure for a token.
#[derive(Serialize)]
pub struct TokenOutput<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub quoted: bool,
}

/// Formats tokens as JSON.
pub fn format_tokens_json(tokens: &[Token<'_>]) -> Result<String, serde_json::Error> {
    let output: Vec<TokenOutput> = tokens
        .iter()
        .map(|token| TokenOutput {
            text: token.text(),
            start: token.start(),
            end: token.end(),
            quoted: token.is_quoted(),
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Formats tokens as a table of byte spans.
pub fn format_tokens_table(tokens: &[Token<'_>], use_colors: bool) -> String {
    if tokens.is_empty() {
        return "No tokens.\n".to_string();
    }

    let mut output = String::new();
    let header = format!("{:<11} {}", "Span", "Text");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for token in tokens {
        let span = format!("{}..{}", token.start(), token.end());
        let text = if token.is_quoted() {
            format!("{:?}", token.text())
        } else {
            token.text().to_string()
        };
        let text = if use_colors {
            text.yellow().to_string()
        } else {
            text
        };
        output.push_str(&format!("{span:<11} {text}\n"));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskq_filter::filter::Tokenizer;

    #[test]
    fn test_tokens_table() {
        let tokens = Tokenizer::new(r#"buy "oat milk""#).to_list().unwrap();
        let table = format_tokens_table(&tokens, false);
        assert_eq!(
            table,
            "Span        Text\n0..3        buy\n4..14       \"oat milk\"\n"
        );
    }

    #[test]
    fn test_tokens_json() {
        let tokens = Tokenizer::new("a 'b c'").to_list().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&format_tokens_json(&tokens).unwrap()).unwrap();
        assert_eq!(value[1]["text"], "b c");
        assert_eq!(value[1]["start"], 2);
        assert_eq!(value[1]["end"], 7);
        assert_eq!(value[1]["quoted"], true);
    }

    #[test]
    fn test_no_tokens() {
        let tokens = Tokenizer::new("   ").to_list().unwrap();
        assert_eq!(format_tokens_table(&tokens, false), "No tokens.\n");
    }
}
