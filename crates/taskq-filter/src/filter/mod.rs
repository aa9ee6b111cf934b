//! Filter expression tokenizer, parser and evaluator.
//!
//! A query is a boolean combination of single-field tests. Which fields exist,
//! which operators they accept and how their values compare is decided by a
//! [`Schema`], so the same engine filters any record type that implements
//! [`Record`].
//!
//! # Supported Syntax
//!
//! ## Field tests
//! - `field=phrase` - value equals the phrase
//! - `field<phrase` - text value contains the phrase; date or number is below it
//! - `field>phrase` - text value and phrase contain one another; date or number is above it
//! - `field phrase` - the field's own default comparison
//! - `field=[a b "c d"]` - any of the phrases, for fields that allow sets
//!
//! Text comparisons ignore case. Quote a phrase that contains whitespace or
//! one of `( ) & |`.
//!
//! ## Date phrases
//! - `2026-10-16`
//! - `today`, `tomorrow`, `yesterday`
//! - `+3d`, `-2d` - days from today
//!
//! ## Boolean Operators
//! - `&&` - AND
//! - `||` - OR
//! - `!` - NOT
//! - `()` - Grouping
//!
//! # Example
//!
//! ```
//! use taskq_filter::filter::{self, FieldKind, FieldSpec, Schema};
//!
//! let schema = Schema::new()
//!     .with_field(FieldSpec::new("tag", FieldKind::TextSet).set_filterable(true))
//!     .with_field(FieldSpec::new("priority", FieldKind::Number));
//!
//! let predicate = filter::parse("tag=[home work] && !priority>3", &schema).unwrap();
//! assert_eq!(predicate.to_string(), "(tag=[home work] && !priority>3)");
//!
//! let err = filter::parse("priorty<2", &schema).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Unknown field priorty at position 0. Did you mean priority?"
//! );
//! ```

mod ast;
mod diagnostic;
mod error;
mod evaluator;
mod operator;
mod parser;
mod predicate;
mod schema;
mod tokenizer;

pub use ast::{FieldPredicate, Predicate, TestValue};
pub use diagnostic::{contains_ignore_case, DiagnosticBuilder, DiagnosticMessage, Segment, Style};
pub use error::{FilterError, FilterErrorKind, FilterResult};
pub use evaluator::FilterEvaluator;
pub use operator::{check_operator, resolve_operator, FilterOperator, PhraseContext};
pub use parser::{FilterParser, MAX_FIELD_TESTS, MAX_NESTING_DEPTH};
pub use predicate::FieldPredicateBuilder;
pub use schema::{FieldKind, FieldSpec, FieldValue, PhraseValidator, Record, Schema};
pub use tokenizer::{
    Token, TokenCursor, TokenPattern, TokenizeError, TokenizeResult, Tokenizer,
};

/// Parses `query` against `schema`, resolving relative dates against today.
///
/// # Errors
///
/// See [`FilterParser::parse`].
pub fn parse(query: &str, schema: &Schema) -> FilterResult<Predicate> {
    FilterParser::new(schema).parse(query)
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod evaluator_tests;
