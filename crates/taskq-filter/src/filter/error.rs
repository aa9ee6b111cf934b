//! Error types for the filter parser.

use thiserror::Error;

use super::diagnostic::DiagnosticMessage;
use super::operator::FilterOperator;
use super::schema::FieldSpec;
use super::tokenizer::TokenizeError;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while turning a query into a predicate.
///
/// Every variant carries the byte position it refers to and a
/// [`DiagnosticMessage`] for the user; `Display` prints the plain text of
/// that message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Input ran out before a required token could be read.
    #[error("{message}")]
    EndOfString {
        position: usize,
        message: DiagnosticMessage,
    },

    /// The character at the cursor cannot start the required token.
    #[error("{message}")]
    NoMatchableCharacter {
        position: usize,
        found: char,
        message: DiagnosticMessage,
    },

    /// The query names a field the schema does not have.
    #[error("{message}")]
    InvalidKey {
        key: String,
        position: usize,
        message: DiagnosticMessage,
    },

    /// The field exists but does not accept a bracketed phrase set.
    #[error("{message}")]
    InvalidSetKey {
        key: String,
        position: usize,
        message: DiagnosticMessage,
    },

    /// The operator is unknown or not supported by the field.
    #[error("{message}")]
    InvalidOperator {
        operator: String,
        field: String,
        position: usize,
        message: DiagnosticMessage,
    },

    /// The operator cannot test membership in a phrase set.
    #[error("{message}")]
    InvalidSetOperator {
        operator: String,
        field: String,
        position: usize,
        message: DiagnosticMessage,
    },

    /// The test phrase does not fit the field's value syntax.
    #[error("{message}")]
    InvalidTestPhrase {
        phrase: String,
        field: String,
        position: usize,
        message: DiagnosticMessage,
    },

    /// The boolean structure of the query is malformed.
    #[error("{message}")]
    BooleanExpression {
        position: usize,
        message: DiagnosticMessage,
        #[source]
        cause: Option<Box<FilterError>>,
    },
}

/// The variant of a [`FilterError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterErrorKind {
    EndOfString,
    NoMatchableCharacter,
    InvalidKey,
    InvalidSetKey,
    InvalidOperator,
    InvalidSetOperator,
    InvalidTestPhrase,
    BooleanExpression,
}

impl FilterErrorKind {
    /// Stable identifier for machine-readable output.
    pub fn code(self) -> &'static str {
        match self {
            FilterErrorKind::EndOfString => "END_OF_STRING",
            FilterErrorKind::NoMatchableCharacter => "NO_MATCHABLE_CHARACTER",
            FilterErrorKind::InvalidKey => "INVALID_KEY",
            FilterErrorKind::InvalidSetKey => "INVALID_SET_KEY",
            FilterErrorKind::InvalidOperator => "INVALID_OPERATOR",
            FilterErrorKind::InvalidSetOperator => "INVALID_SET_OPERATOR",
            FilterErrorKind::InvalidTestPhrase => "INVALID_TEST_PHRASE",
            FilterErrorKind::BooleanExpression => "BOOLEAN_EXPRESSION",
        }
    }
}

impl FilterError {
    /// The variant of this error.
    pub fn kind(&self) -> FilterErrorKind {
        match self {
            FilterError::EndOfString { .. } => FilterErrorKind::EndOfString,
            FilterError::NoMatchableCharacter { .. } => FilterErrorKind::NoMatchableCharacter,
            FilterError::InvalidKey { .. } => FilterErrorKind::InvalidKey,
            FilterError::InvalidSetKey { .. } => FilterErrorKind::InvalidSetKey,
            FilterError::InvalidOperator { .. } => FilterErrorKind::InvalidOperator,
            FilterError::InvalidSetOperator { .. } => FilterErrorKind::InvalidSetOperator,
            FilterError::InvalidTestPhrase { .. } => FilterErrorKind::InvalidTestPhrase,
            FilterError::BooleanExpression { .. } => FilterErrorKind::BooleanExpression,
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &DiagnosticMessage {
        match self {
            FilterError::EndOfString { message, .. }
            | FilterError::NoMatchableCharacter { message, .. }
            | FilterError::InvalidKey { message, .. }
            | FilterError::InvalidSetKey { message, .. }
            | FilterError::InvalidOperator { message, .. }
            | FilterError::InvalidSetOperator { message, .. }
            | FilterError::InvalidTestPhrase { message, .. }
            | FilterError::BooleanExpression { message, .. } => message,
        }
    }

    /// Byte offset in the query the error refers to.
    pub fn position(&self) -> usize {
        match self {
            FilterError::EndOfString { position, .. }
            | FilterError::NoMatchableCharacter { position, .. }
            | FilterError::InvalidKey { position, .. }
            | FilterError::InvalidSetKey { position, .. }
            | FilterError::InvalidOperator { position, .. }
            | FilterError::InvalidSetOperator { position, .. }
            | FilterError::InvalidTestPhrase { position, .. }
            | FilterError::BooleanExpression { position, .. } => *position,
        }
    }

    /// The underlying error of a boolean expression failure.
    pub fn cause(&self) -> Option<&FilterError> {
        match self {
            FilterError::BooleanExpression { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// Creates a boolean expression error.
    pub fn boolean_expression(
        position: usize,
        message: DiagnosticMessage,
        cause: Option<FilterError>,
    ) -> Self {
        FilterError::BooleanExpression {
            position,
            message,
            cause: cause.map(Box::new),
        }
    }

    /// Creates an unknown field error, with an optional suggestion.
    pub fn invalid_key(key: impl Into<String>, position: usize, suggestion: Option<&str>) -> Self {
        let key = key.into();
        let mut builder = DiagnosticMessage::builder()
            .error("Unknown field ")
            .field(key.as_str())
            .position(position);
        if let Some(suggestion) = suggestion {
            builder = builder.hint(". Did you mean ").field(suggestion).hint("?");
        }
        FilterError::InvalidKey {
            key,
            position,
            message: builder.build(),
        }
    }

    /// Creates an error for a phrase set on a field that does not allow one.
    pub fn invalid_set_key(field: &FieldSpec, position: usize) -> Self {
        let message = DiagnosticMessage::builder()
            .error("Field ")
            .field(field.name())
            .error(" does not accept a phrase set")
            .position(position)
            .hint(". Test one phrase at a time and combine them with ||.")
            .build();
        FilterError::InvalidSetKey {
            key: field.name().to_string(),
            position,
            message,
        }
    }

    /// Creates an error for an operator symbol no field understands.
    pub fn unknown_operator(symbol: &str, field: &FieldSpec, position: usize) -> Self {
        let message = DiagnosticMessage::builder()
            .error("Unknown operator ")
            .operator(symbol)
            .text(" for field ")
            .field(field.name())
            .position(position)
            .hint(format!(". Supported: {}.", supported_operators(field)))
            .build();
        FilterError::InvalidOperator {
            operator: symbol.to_string(),
            field: field.name().to_string(),
            position,
            message,
        }
    }

    /// Creates an error for an operator the field does not support.
    pub fn invalid_operator(operator: FilterOperator, field: &FieldSpec, position: usize) -> Self {
        let builder = match operator.symbol() {
            Some(symbol) => DiagnosticMessage::builder()
                .error("Operator ")
                .operator(symbol)
                .error(" is not supported by field ")
                .field(field.name()),
            None => DiagnosticMessage::builder()
                .error("Field ")
                .field(field.name())
                .error(" needs an operator"),
        };
        let message = builder
            .position(position)
            .hint(format!(". Supported: {}.", supported_operators(field)))
            .build();
        FilterError::InvalidOperator {
            operator: operator.to_string(),
            field: field.name().to_string(),
            position,
            message,
        }
    }

    /// Creates an error for an operator that cannot be used with a phrase set.
    pub fn invalid_set_operator(
        operator: FilterOperator,
        field: &FieldSpec,
        position: usize,
    ) -> Self {
        let message = DiagnosticMessage::builder()
            .error("Operator ")
            .operator(operator.to_string())
            .error(" cannot be used with a phrase set on field ")
            .field(field.name())
            .position(position)
            .hint(". Use = or leave the operator out.")
            .build();
        FilterError::InvalidSetOperator {
            operator: operator.to_string(),
            field: field.name().to_string(),
            position,
            message,
        }
    }

    /// Creates an error for a phrase that fails the field's value syntax.
    pub fn invalid_test_phrase(
        phrase: impl Into<String>,
        field: &FieldSpec,
        position: usize,
        reason: &str,
    ) -> Self {
        let phrase = phrase.into();
        let message = DiagnosticMessage::builder()
            .error("Invalid phrase ")
            .phrase(phrase.as_str())
            .text(" for field ")
            .field(field.name())
            .position(position)
            .text(": ")
            .hint(reason)
            .build();
        FilterError::InvalidTestPhrase {
            phrase,
            field: field.name().to_string(),
            position,
            message,
        }
    }
}

impl From<TokenizeError> for FilterError {
    fn from(error: TokenizeError) -> Self {
        match error {
            TokenizeError::EndOfString {
                position,
                open_quote,
            } => {
                let builder = match open_quote {
                    Some(quote) => DiagnosticMessage::builder()
                        .error("Unterminated quote")
                        .position(quote),
                    None => DiagnosticMessage::builder()
                        .error("Unexpected end of input")
                        .position(position),
                };
                FilterError::EndOfString {
                    position,
                    message: builder.build(),
                }
            }
            TokenizeError::NoMatchableCharacter { position, found } => {
                let message = DiagnosticMessage::builder()
                    .error("Unexpected character ")
                    .phrase(found.to_string())
                    .position(position)
                    .build();
                FilterError::NoMatchableCharacter {
                    position,
                    found,
                    message,
                }
            }
        }
    }
}

/// Lists a field's operators for hints, e.g. "=, <, >, or no operator".
fn supported_operators(field: &FieldSpec) -> String {
    let mut parts: Vec<&str> = field
        .operators()
        .iter()
        .filter_map(|op| op.symbol())
        .collect();
    if field.supports(FilterOperator::Convenience) {
        parts.push("or no operator");
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
