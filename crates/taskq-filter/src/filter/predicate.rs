//! Construction of single-field predicates.
//!
//! The builder checks the field against the schema, the operator against the
//! field, and every phrase against the field's value syntax. A
//! [`FieldPredicate`] only exists once all three checks have passed.

use chrono::{Days, NaiveDate};

use super::ast::{FieldPredicate, TestValue};
use super::error::{FilterError, FilterResult};
use super::operator::{check_operator, FilterOperator, PhraseContext};
use super::schema::{FieldKind, FieldSpec, Schema};

const DATE_HINT: &str = "expected YYYY-MM-DD, today, tomorrow, yesterday or a day offset such as +3d";
const NUMBER_HINT: &str = "expected a whole number";

/// Builds validated single-field predicates for one schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldPredicateBuilder<'s> {
    schema: &'s Schema,
    reference_date: NaiveDate,
}

impl<'s> FieldPredicateBuilder<'s> {
    /// Creates a builder. Relative date phrases such as `today` are resolved
    /// against `reference_date` when a predicate is built.
    pub fn new(schema: &'s Schema, reference_date: NaiveDate) -> Self {
        Self {
            schema,
            reference_date,
        }
    }

    /// The schema fields are looked up in.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// The date `today` resolves to.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Looks up a field by name or alias.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the schema has no such field.
    pub fn field(&self, key: &str) -> FilterResult<&'s FieldSpec> {
        self.lookup(key, 0, PhraseContext::Single)
    }

    /// Builds a single-phrase predicate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey`, `InvalidOperator` or `InvalidTestPhrase`.
    pub fn build(
        &self,
        key: &str,
        operator: FilterOperator,
        phrase: &str,
    ) -> FilterResult<FieldPredicate> {
        let field = self.lookup(key, 0, PhraseContext::Single)?;
        check_operator(operator, field, PhraseContext::Single, 0)?;
        self.assemble(field, operator, &[(phrase, 0)], PhraseContext::Single)
    }

    /// Builds a predicate that matches if any of `phrases` matches.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey`, `InvalidSetKey`, `InvalidSetOperator`,
    /// `InvalidOperator` or `InvalidTestPhrase`.
    pub fn build_set(
        &self,
        key: &str,
        operator: FilterOperator,
        phrases: &[&str],
    ) -> FilterResult<FieldPredicate> {
        let field = self.lookup(key, 0, PhraseContext::Set)?;
        check_operator(operator, field, PhraseContext::Set, 0)?;
        let positioned: Vec<(&str, usize)> = phrases.iter().map(|p| (*p, 0)).collect();
        self.assemble(field, operator, &positioned, PhraseContext::Set)
    }

    pub(crate) fn lookup(
        &self,
        key: &str,
        position: usize,
        context: PhraseContext,
    ) -> FilterResult<&'s FieldSpec> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FilterError::invalid_key(key, position, self.schema.suggest(key)))?;
        if context == PhraseContext::Set && !field.is_set_filterable() {
            return Err(FilterError::invalid_set_key(field, position));
        }
        Ok(field)
    }

    /// Validates the phrases and builds the leaf. The operator must already
    /// have been checked.
    pub(crate) fn assemble(
        &self,
        field: &FieldSpec,
        operator: FilterOperator,
        phrases: &[(&str, usize)],
        context: PhraseContext,
    ) -> FilterResult<FieldPredicate> {
        if phrases.is_empty() {
            return Err(FilterError::invalid_test_phrase(
                "",
                field,
                0,
                "a phrase set needs at least one phrase",
            ));
        }

        let values = phrases
            .iter()
            .map(|(phrase, position)| self.parse_phrase(field, phrase, *position))
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(FieldPredicate::new(
            field,
            operator,
            phrases.iter().map(|(phrase, _)| phrase.to_string()).collect(),
            values,
            context == PhraseContext::Set,
        ))
    }

    fn parse_phrase(
        &self,
        field: &FieldSpec,
        phrase: &str,
        position: usize,
    ) -> FilterResult<TestValue> {
        let invalid = |reason: &str| FilterError::invalid_test_phrase(phrase, field, position, reason);

        if phrase.trim().is_empty() {
            return Err(invalid("the phrase is empty"));
        }

        let value = match field.kind() {
            FieldKind::Text | FieldKind::TextSet => TestValue::Text(phrase.to_lowercase()),
            FieldKind::Date => parse_date_phrase(phrase, self.reference_date)
                .map(TestValue::Date)
                .ok_or_else(|| invalid(DATE_HINT))?,
            FieldKind::Number => phrase
                .parse::<i64>()
                .map(TestValue::Number)
                .map_err(|_| invalid(NUMBER_HINT))?,
        };

        if !field.accepts_phrase(phrase) {
            return Err(invalid(
                field
                    .phrase_hint()
                    .unwrap_or("the phrase does not match the field's syntax"),
            ));
        }
        Ok(value)
    }
}

/// Parses `YYYY-MM-DD`, `today`, `tomorrow`, `yesterday`, or `+Nd` / `-Nd`.
fn parse_date_phrase(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = phrase.to_lowercase();
    match lower.as_str() {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => match parse_day_offset(&lower) {
            Some(days) if days >= 0 => today.checked_add_days(Days::new(days.unsigned_abs())),
            Some(days) => today.checked_sub_days(Days::new(days.unsigned_abs())),
            None => NaiveDate::parse_from_str(phrase, "%Y-%m-%d").ok(),
        },
    }
}

/// Parses a signed day offset such as `+3d` or `-2d`.
fn parse_day_offset(phrase: &str) -> Option<i64> {
    let number = phrase.strip_suffix('d')?;
    if !number.starts_with(['+', '-']) {
        return None;
    }
    number.parse().ok()
}
