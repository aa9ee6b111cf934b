//! Filter evaluation against records.
//!
//! Text comparisons are case-insensitive:
//!
//! | operator | text | date / number |
//! |----------|------|---------------|
//! | `=` | value equals phrase | value equals phrase |
//! | `<` | value contains phrase | value before / below phrase |
//! | `>` | value contains phrase, or phrase contains value | value after / above phrase |
//!
//! A text set matches if any element matches. A bracketed phrase set matches
//! if any phrase matches. A record without a value for the field never
//! matches, whatever the operator.
//!
//! # Example
//!
//! ```
//! use taskq_filter::filter::{
//!     FieldKind, FieldSpec, FieldValue, FilterEvaluator, FilterParser, Record, Schema,
//! };
//!
//! struct Note {
//!     title: String,
//! }
//!
//! impl Record for Note {
//!     fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
//!         (field == "title").then(|| FieldValue::Text(&self.title))
//!     }
//! }
//!
//! let schema = Schema::new().with_field(FieldSpec::new("title", FieldKind::Text));
//! let predicate = FilterParser::new(&schema).parse("title<milk").unwrap();
//!
//! let notes = vec![
//!     Note { title: "Buy milk".to_string() },
//!     Note { title: "Call mom".to_string() },
//! ];
//! let evaluator = FilterEvaluator::new(&predicate);
//! assert_eq!(evaluator.filter_records(&notes).len(), 1);
//! ```

use std::cmp::Ordering;

use super::ast::{FieldPredicate, Predicate, TestValue};
use super::operator::FilterOperator;
use super::schema::{FieldValue, Record};

/// Evaluates a parsed predicate against records.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    predicate: &'a Predicate,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(predicate: &'a Predicate) -> Self {
        Self { predicate }
    }

    /// Returns true if the record matches the predicate.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        evaluate(self.predicate, record)
    }

    /// Filters a slice of records, returning only those that match.
    pub fn filter_records<'b, R: Record>(&self, records: &'b [R]) -> Vec<&'b R> {
        records.iter().filter(|record| self.matches(*record)).collect()
    }

    /// Counts the matching records.
    pub fn count<R: Record>(&self, records: &[R]) -> usize {
        records.iter().filter(|record| self.matches(*record)).count()
    }
}

/// Evaluates a predicate tree against a record.
pub(crate) fn evaluate<R: Record + ?Sized>(predicate: &Predicate, record: &R) -> bool {
    match predicate {
        Predicate::Field(leaf) => evaluate_leaf(leaf, record),
        Predicate::And(left, right) => evaluate(left, record) && evaluate(right, record),
        Predicate::Or(left, right) => evaluate(left, record) || evaluate(right, record),
        Predicate::Not(inner) => !evaluate(inner, record),
    }
}

fn evaluate_leaf<R: Record + ?Sized>(leaf: &FieldPredicate, record: &R) -> bool {
    let Some(value) = record.field_value(leaf.field()) else {
        return false;
    };
    let operator = leaf.effective_operator();
    leaf.values()
        .iter()
        .any(|phrase| value_matches(leaf.field(), value, operator, phrase))
}

fn value_matches(field: &str, value: FieldValue<'_>, operator: FilterOperator, phrase: &TestValue) -> bool {
    match (value, phrase) {
        (FieldValue::Text(text), TestValue::Text(phrase)) => text_matches(text, operator, phrase),
        (FieldValue::TextSet(items), TestValue::Text(phrase)) => items
            .iter()
            .any(|item| text_matches(item, operator, phrase)),
        (FieldValue::Date(date), TestValue::Date(phrase)) => {
            ordering_matches(date.cmp(phrase), operator)
        }
        (FieldValue::Number(number), TestValue::Number(phrase)) => {
            ordering_matches(number.cmp(phrase), operator)
        }
        (value, phrase) => {
            tracing::trace!(field, ?value, ?phrase, "record value does not fit the field kind");
            false
        }
    }
}

/// Compares a record value with an already lower-cased phrase.
fn text_matches(value: &str, operator: FilterOperator, phrase: &str) -> bool {
    let value = value.to_lowercase();
    match operator {
        FilterOperator::Equal => value == phrase,
        FilterOperator::Less => value.contains(phrase),
        FilterOperator::Greater | FilterOperator::Convenience => {
            !value.is_empty() && (value.contains(phrase) || phrase.contains(value.as_str()))
        }
    }
}

/// `ordering` is the record value compared with the phrase.
fn ordering_matches(ordering: Ordering, operator: FilterOperator) -> bool {
    match operator {
        FilterOperator::Equal => ordering == Ordering::Equal,
        FilterOperator::Less => ordering == Ordering::Less,
        FilterOperator::Greater | FilterOperator::Convenience => ordering == Ordering::Greater,
    }
}
