//! Recursive descent parser for filter expressions.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate};

use super::ast::Predicate;
use super::diagnostic::DiagnosticMessage;
use super::error::{FilterError, FilterResult};
use super::operator::{resolve_operator, PhraseContext};
use super::predicate::FieldPredicateBuilder;
use super::schema::{FieldSpec, Schema};
use super::tokenizer::{Token, TokenPattern, TokenizeError, Tokenizer};

/// Maximum nesting of parentheses and `!`.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of field tests in one query.
///
/// `&&` and `||` chains nest one level per test, so this also bounds the
/// depth of the predicate tree.
pub const MAX_FIELD_TESTS: usize = 1024;

/// Characters that end an unquoted phrase.
const PHRASE_STOP: &str = "()&|";

static OR: OnceLock<TokenPattern> = OnceLock::new();
static AND: OnceLock<TokenPattern> = OnceLock::new();
static NOT: OnceLock<TokenPattern> = OnceLock::new();
static OPEN_PAREN: OnceLock<TokenPattern> = OnceLock::new();
static CLOSE_PAREN: OnceLock<TokenPattern> = OnceLock::new();
static OPEN_BRACKET: OnceLock<TokenPattern> = OnceLock::new();
static CLOSE_BRACKET: OnceLock<TokenPattern> = OnceLock::new();
static FIELD: OnceLock<TokenPattern> = OnceLock::new();
static OPERATOR: OnceLock<TokenPattern> = OnceLock::new();

fn compiled(cell: &'static OnceLock<TokenPattern>, pattern: &str) -> &'static TokenPattern {
    cell.get_or_init(|| TokenPattern::new(pattern).expect("built-in token pattern is valid"))
}

fn or_token() -> &'static TokenPattern {
    compiled(&OR, r"\|\|")
}

fn and_token() -> &'static TokenPattern {
    compiled(&AND, "&&")
}

fn not_token() -> &'static TokenPattern {
    compiled(&NOT, "!")
}

fn open_paren() -> &'static TokenPattern {
    compiled(&OPEN_PAREN, r"\(")
}

fn close_paren() -> &'static TokenPattern {
    compiled(&CLOSE_PAREN, r"\)")
}

fn open_bracket() -> &'static TokenPattern {
    compiled(&OPEN_BRACKET, r"\[")
}

fn close_bracket() -> &'static TokenPattern {
    compiled(&CLOSE_BRACKET, r"\]")
}

fn field_token() -> &'static TokenPattern {
    compiled(&FIELD, r"[A-Za-z_][A-Za-z0-9_.\-]*")
}

fn operator_token() -> &'static TokenPattern {
    compiled(&OPERATOR, "[<>=]+")
}

/// Parser for filter queries over one schema.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr ("||" and_expr)*
/// and_expr   ::= unary_expr ("&&" unary_expr)*
/// unary_expr ::= "!" unary_expr | primary
/// primary    ::= "(" expression ")" | test
/// test       ::= field operator? (phrase | "[" phrase+ "]")
/// operator   ::= "=" | "<" | ">"
/// ```
///
/// A phrase is a bare word ending at whitespace or one of `( ) & |`
/// (and `]` inside a set), or a single- or double-quoted string with
/// backslash escapes.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `!` (NOT) - unary
/// 2. `&&` (AND) - binary, left-associative
/// 3. `||` (OR) - binary, left-associative
///
/// # Example
///
/// ```
/// use taskq_filter::filter::{FieldKind, FieldSpec, FilterParser, Predicate, Schema};
///
/// let schema = Schema::new()
///     .with_field(FieldSpec::new("tag", FieldKind::TextSet))
///     .with_field(FieldSpec::new("priority", FieldKind::Number));
/// let parser = FilterParser::new(&schema);
///
/// let predicate = parser.parse("tag>wo && priority<5").unwrap();
/// assert!(matches!(predicate, Predicate::And(_, _)));
/// assert_eq!(predicate.to_string(), "(tag>wo && priority<5)");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterParser<'s> {
    schema: &'s Schema,
    reference_date: NaiveDate,
}

impl<'s> FilterParser<'s> {
    /// Creates a parser that resolves relative dates against the local date.
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_reference_date(schema, Local::now().date_naive())
    }

    /// Creates a parser that resolves `today`, `+3d` and friends against
    /// `reference_date`.
    pub fn with_reference_date(schema: &'s Schema, reference_date: NaiveDate) -> Self {
        Self {
            schema,
            reference_date,
        }
    }

    /// The schema queries are checked against.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// The date relative date phrases resolve against.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Parses a query into a predicate tree.
    ///
    /// # Errors
    ///
    /// Field, operator and phrase errors are returned as `InvalidKey`,
    /// `InvalidSetKey`, `InvalidOperator`, `InvalidSetOperator` or
    /// `InvalidTestPhrase`. Everything wrong with the structure of the query
    /// (empty input, unbalanced parentheses, a missing phrase, trailing
    /// input, too much nesting, more than [`MAX_FIELD_TESTS`] tests) is a
    /// `BooleanExpression`, with the tokenizer
    /// error as its cause where there is one.
    pub fn parse(&self, query: &str) -> FilterResult<Predicate> {
        let mut state = ParseState {
            tokenizer: Tokenizer::new(query),
            builder: FieldPredicateBuilder::new(self.schema, self.reference_date),
            depth: 0,
            tests: 0,
        };

        let result = state.parse_query();
        match &result {
            Ok(predicate) => tracing::debug!(query, predicate = %predicate, "parsed filter"),
            Err(e) => tracing::debug!(
                query,
                code = e.kind().code(),
                position = e.position(),
                "rejected filter"
            ),
        }
        result
    }
}

/// State of one parse.
struct ParseState<'q, 's> {
    tokenizer: Tokenizer<'q>,
    builder: FieldPredicateBuilder<'s>,
    depth: usize,
    tests: usize,
}

impl<'q, 's> ParseState<'q, 's> {
    fn parse_query(&mut self) -> FilterResult<Predicate> {
        if !self.tokenizer.has_more_tokens() {
            let position = self.tokenizer.token_start();
            return Err(FilterError::boolean_expression(
                position,
                DiagnosticMessage::builder()
                    .error("Empty filter expression")
                    .build(),
                None,
            ));
        }

        let predicate = self.parse_or_expr()?;

        if let Some(found) = self.tokenizer.peek_char() {
            let position = self.tokenizer.token_start();
            let (builder, found) = if found == ')' {
                (DiagnosticMessage::builder().error("Unmatched "), found.to_string())
            } else {
                let word = self.peek_word().unwrap_or_else(|| found.to_string());
                (DiagnosticMessage::builder().error("Unexpected "), word)
            };
            let message = builder
                .phrase(found)
                .position(position)
                .hint(". Join tests with && or ||.")
                .build();
            return Err(FilterError::boolean_expression(position, message, None));
        }

        Ok(predicate)
    }

    /// Parses OR expressions: `and_expr ("||" and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<Predicate> {
        let mut left = self.parse_and_expr()?;

        while self.tokenizer.try_next_pattern(or_token()).is_some() {
            let right = self.parse_and_expr()?;
            left = Predicate::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `unary_expr ("&&" unary_expr)*`
    fn parse_and_expr(&mut self) -> FilterResult<Predicate> {
        let mut left = self.parse_unary_expr()?;

        while self.tokenizer.try_next_pattern(and_token()).is_some() {
            let right = self.parse_unary_expr()?;
            left = Predicate::and(left, right);
        }

        Ok(left)
    }

    /// Parses unary expressions: `"!" unary_expr | primary`
    fn parse_unary_expr(&mut self) -> FilterResult<Predicate> {
        let Some(bang) = self.tokenizer.try_next_pattern(not_token()) else {
            return self.parse_primary();
        };

        self.enter(bang.start())?;
        let inner = self.parse_unary_expr();
        self.depth -= 1;
        Ok(Predicate::negate(inner?))
    }

    /// Parses primary expressions: `"(" expression ")" | test`
    fn parse_primary(&mut self) -> FilterResult<Predicate> {
        let Some(open) = self.tokenizer.try_next_pattern(open_paren()) else {
            return self.parse_test();
        };

        self.enter(open.start())?;
        let inner = self.parse_or_expr();
        self.depth -= 1;
        let inner = inner?;

        if self.tokenizer.try_next_pattern(close_paren()).is_none() {
            let position = self.tokenizer.token_start();
            let message = DiagnosticMessage::builder()
                .error("Missing ")
                .phrase(")")
                .position(position)
                .hint(format!(" to close the parenthesis opened at position {}", open.start()))
                .build();
            return Err(FilterError::boolean_expression(position, message, None));
        }

        Ok(inner)
    }

    /// Parses a single-field test.
    fn parse_test(&mut self) -> FilterResult<Predicate> {
        let key = match self.tokenizer.next_pattern(field_token()) {
            Ok(key) => key,
            Err(e) => {
                let position = e.position();
                let builder = DiagnosticMessage::builder()
                    .error("Expected a field name")
                    .position(position);
                let message = match self.peek_word() {
                    Some(found) => builder.text(", found ").phrase(found),
                    None => builder.text(", found end of input"),
                }
                .build();
                return Err(FilterError::boolean_expression(
                    position,
                    message,
                    Some(e.into()),
                ));
            }
        };

        self.tests += 1;
        if self.tests > MAX_FIELD_TESTS {
            let message = DiagnosticMessage::builder()
                .error("Too many field tests")
                .position(key.start())
                .hint(format!(". At most {MAX_FIELD_TESTS} are allowed."))
                .build();
            return Err(FilterError::boolean_expression(key.start(), message, None));
        }

        let symbol = self.tokenizer.try_next_pattern(operator_token());
        let operator_position = symbol
            .as_ref()
            .map_or_else(|| self.tokenizer.token_start(), Token::start);
        let context = if self.tokenizer.peek_char() == Some('[') {
            PhraseContext::Set
        } else {
            PhraseContext::Single
        };

        let field = self.builder.lookup(key.text(), key.start(), context)?;
        let operator = resolve_operator(
            symbol.as_ref().map(Token::text),
            field,
            context,
            operator_position,
        )?;

        let phrases = match context {
            PhraseContext::Single => vec![self.read_phrase(field, false)?],
            PhraseContext::Set => self.read_phrase_set(field)?,
        };
        let positioned: Vec<(&str, usize)> = phrases
            .iter()
            .map(|phrase| (phrase.text(), phrase.start()))
            .collect();

        let leaf = self.builder.assemble(field, operator, &positioned, context)?;
        tracing::debug!(position = key.start(), leaf = %leaf, "parsed field test");
        Ok(Predicate::Field(leaf))
    }

    fn read_phrase(&mut self, field: &FieldSpec, in_set: bool) -> FilterResult<Token<'q>> {
        let stop = |c: char| PHRASE_STOP.contains(c) || (in_set && c == ']');
        self.tokenizer.next_word_until(stop).map_err(|e| {
            let position = e.position();
            let unterminated = matches!(
                e,
                TokenizeError::EndOfString {
                    open_quote: Some(_),
                    ..
                }
            );
            let cause = FilterError::from(e);
            let message = if unterminated {
                cause.message().clone()
            } else {
                DiagnosticMessage::builder()
                    .error("Missing phrase for field ")
                    .field(field.name())
                    .position(position)
                    .build()
            };
            FilterError::boolean_expression(position, message, Some(cause))
        })
    }

    /// Reads `"[" phrase+ "]"`.
    fn read_phrase_set(&mut self, field: &FieldSpec) -> FilterResult<Vec<Token<'q>>> {
        let open = self.tokenizer.next_pattern(open_bracket())?;
        let mut phrases = Vec::new();

        while self.tokenizer.try_next_pattern(close_bracket()).is_none() {
            if !self.tokenizer.has_more_tokens() {
                let position = self.tokenizer.token_start();
                let message = DiagnosticMessage::builder()
                    .error("Missing ")
                    .phrase("]")
                    .position(position)
                    .hint(format!(" to close the phrase set opened at position {}", open.start()))
                    .build();
                return Err(FilterError::boolean_expression(position, message, None));
            }
            phrases.push(self.read_phrase(field, true)?);
        }

        if phrases.is_empty() {
            let message = DiagnosticMessage::builder()
                .error("Empty phrase set for field ")
                .field(field.name())
                .position(open.start())
                .build();
            return Err(FilterError::boolean_expression(open.start(), message, None));
        }
        Ok(phrases)
    }

    /// The next whitespace-separated word, without consuming it.
    fn peek_word(&self) -> Option<String> {
        self.tokenizer
            .clone()
            .next_word()
            .ok()
            .map(|token| token.text().to_string())
    }

    fn enter(&mut self, position: usize) -> FilterResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            let message = DiagnosticMessage::builder()
                .error("Expression nested too deeply")
                .position(position)
                .hint(format!(". At most {MAX_NESTING_DEPTH} levels are allowed."))
                .build();
            return Err(FilterError::boolean_expression(position, message, None));
        }
        self.depth += 1;
        Ok(())
    }
}
