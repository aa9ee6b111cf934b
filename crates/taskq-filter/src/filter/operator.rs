//! Filter operators and their resolution against a field.

use std::fmt;

use serde::Serialize;

use super::error::{FilterError, FilterResult};
use super::schema::FieldSpec;

/// Comparison operator of a single-field test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// `=`
    Equal,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// No operator written (`field phrase`). Each field decides what it means.
    Convenience,
}

impl FilterOperator {
    /// All operators, in display order.
    pub const ALL: [FilterOperator; 4] = [
        FilterOperator::Equal,
        FilterOperator::Less,
        FilterOperator::Greater,
        FilterOperator::Convenience,
    ];

    /// The written symbol, or `None` for the convenience form.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            FilterOperator::Equal => Some("="),
            FilterOperator::Less => Some("<"),
            FilterOperator::Greater => Some(">"),
            FilterOperator::Convenience => None,
        }
    }

    /// Maps a written symbol to an operator. `None` for unknown symbols.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(FilterOperator::Equal),
            "<" => Some(FilterOperator::Less),
            ">" => Some(FilterOperator::Greater),
            _ => None,
        }
    }

    /// Upper-case name used in listings.
    pub fn name(self) -> &'static str {
        match self {
            FilterOperator::Equal => "EQUAL",
            FilterOperator::Less => "LESS",
            FilterOperator::Greater => "GREATER",
            FilterOperator::Convenience => "CONVENIENCE",
        }
    }

    /// Returns true if the operator can test membership in a phrase set.
    pub fn allowed_in_set(self) -> bool {
        matches!(self, FilterOperator::Equal | FilterOperator::Convenience)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol().unwrap_or(""))
    }
}

/// Whether a test phrase is a single value or a bracketed set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseContext {
    /// `field op phrase`
    Single,
    /// `field op [phrase ...]`
    Set,
}

/// Resolves an operator symbol for a field.
///
/// A missing symbol stands for [`FilterOperator::Convenience`].
///
/// # Errors
///
/// Returns `InvalidOperator` for an unknown symbol or one the field does not
/// support, and `InvalidSetOperator` for an operator that cannot test set
/// membership when `context` is [`PhraseContext::Set`].
pub fn resolve_operator(
    symbol: Option<&str>,
    field: &FieldSpec,
    context: PhraseContext,
    position: usize,
) -> FilterResult<FilterOperator> {
    let operator = match symbol {
        None => FilterOperator::Convenience,
        Some(symbol) => FilterOperator::from_symbol(symbol)
            .ok_or_else(|| FilterError::unknown_operator(symbol, field, position))?,
    };
    check_operator(operator, field, context, position)?;
    Ok(operator)
}

/// Checks that `operator` may be used with `field` in `context`.
///
/// # Errors
///
/// Same as [`resolve_operator`].
pub fn check_operator(
    operator: FilterOperator,
    field: &FieldSpec,
    context: PhraseContext,
    position: usize,
) -> FilterResult<()> {
    if !field.supports(operator) {
        return Err(FilterError::invalid_operator(operator, field, position));
    }
    if context == PhraseContext::Set && !operator.allowed_in_set() {
        return Err(FilterError::invalid_set_operator(operator, field, position));
    }
    Ok(())
}
