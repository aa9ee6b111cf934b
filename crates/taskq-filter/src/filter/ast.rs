//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use chrono::NaiveDate;

use super::diagnostic::{DiagnosticBuilder, DiagnosticMessage};
use super::operator::FilterOperator;
use super::schema::{FieldKind, FieldSpec, Record};

/// A test phrase after it has been checked against the field's syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestValue {
    /// Lower-cased text.
    Text(String),
    /// A resolved calendar date.
    Date(NaiveDate),
    /// An integer.
    Number(i64),
}

/// A single-field test: field, operator and one or more phrases.
///
/// Instances are only created by the
/// [`FieldPredicateBuilder`](super::FieldPredicateBuilder), so the field is
/// known and the operator is valid for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate {
    field: String,
    kind: FieldKind,
    operator: FilterOperator,
    effective: FilterOperator,
    phrases: Vec<String>,
    values: Vec<TestValue>,
    set: bool,
}

impl FieldPredicate {
    pub(crate) fn new(
        field: &FieldSpec,
        operator: FilterOperator,
        phrases: Vec<String>,
        values: Vec<TestValue>,
        set: bool,
    ) -> Self {
        Self {
            field: field.name().to_string(),
            kind: field.kind(),
            operator,
            effective: field.effective_operator(operator),
            phrases,
            values,
            set,
        }
    }

    /// Canonical name of the tested field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Semantic type of the tested field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The operator as written in the query.
    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// The comparison actually applied; the convenience form is replaced by
    /// the field's declared meaning.
    pub fn effective_operator(&self) -> FilterOperator {
        self.effective
    }

    /// The phrases as written.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// The parsed phrases, in the same order as [`phrases`](Self::phrases).
    pub fn values(&self) -> &[TestValue] {
        &self.values
    }

    /// Returns true if the phrases were written as a bracketed set.
    pub fn is_set(&self) -> bool {
        self.set
    }

    fn comparison_words(&self) -> &'static str {
        match (self.kind, self.effective) {
            (FieldKind::Date, FilterOperator::Equal) => "is on",
            (FieldKind::Date, FilterOperator::Less) => "is before",
            (FieldKind::Date, _) => "is after",
            (FieldKind::Number, FilterOperator::Equal) => "equals",
            (FieldKind::Number, FilterOperator::Less) => "is less than",
            (FieldKind::Number, _) => "is greater than",
            (_, FilterOperator::Equal) => "equals",
            (_, FilterOperator::Less) => "contains",
            (_, _) => "loosely matches",
        }
    }

    fn describe_into(&self, mut builder: DiagnosticBuilder) -> DiagnosticBuilder {
        builder = builder
            .field(self.field.as_str())
            .text(" ")
            .operator(self.comparison_words())
            .text(" ");
        if self.set {
            builder = builder.text("any of ");
        }
        for (i, phrase) in self.phrases.iter().enumerate() {
            if i > 0 {
                builder = builder.text(", ");
            }
            builder = builder.phrase(phrase);
        }
        builder
    }
}

impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field)?;
        match self.operator.symbol() {
            Some(symbol) => f.write_str(symbol)?,
            None => f.write_str(" ")?,
        }
        if self.set {
            f.write_str("[")?;
            for (i, phrase) in self.phrases.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write_phrase(f, phrase)?;
            }
            f.write_str("]")
        } else {
            match self.phrases.first() {
                Some(phrase) => write_phrase(f, phrase),
                None => Ok(()),
            }
        }
    }
}

/// Writes a phrase so the parser reads it back unchanged.
fn write_phrase(f: &mut fmt::Formatter<'_>, phrase: &str) -> fmt::Result {
    let needs_quotes = phrase.is_empty()
        || phrase.starts_with(['"', '\'', '<', '>', '=', '['])
        || phrase.contains(|c: char| c.is_whitespace() || "()&|[]".contains(c));
    if !needs_quotes {
        return f.write_str(phrase);
    }

    f.write_str("\"")?;
    for c in phrase.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Represents a parsed filter expression.
///
/// A predicate tree is immutable and fully resolved: every leaf refers to a
/// known field with an operator valid for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// A single-field test.
    Field(FieldPredicate),

    /// Logical AND of two predicates.
    And(Box<Predicate>, Box<Predicate>),

    /// Logical OR of two predicates.
    Or(Box<Predicate>, Box<Predicate>),

    /// Logical NOT of a predicate.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Creates an AND predicate from two predicates.
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR predicate from two predicates.
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    /// Creates a NOT predicate from another predicate.
    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Returns true if the record satisfies the predicate.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> bool {
        super::evaluator::evaluate(self, record)
    }

    /// All single-field tests in the tree, left to right.
    pub fn leaves(&self) -> Vec<&FieldPredicate> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a FieldPredicate>) {
        match self {
            Predicate::Field(field) => leaves.push(field),
            Predicate::Not(inner) => inner.collect_leaves(leaves),
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }

    /// Explains the predicate in words, with fields, operators and phrases
    /// tagged by style.
    pub fn describe(&self) -> DiagnosticMessage {
        self.describe_into(DiagnosticMessage::builder(), false)
            .build()
    }

    fn describe_into(&self, builder: DiagnosticBuilder, nested: bool) -> DiagnosticBuilder {
        match self {
            Predicate::Field(field) => field.describe_into(builder),
            Predicate::Not(inner) => {
                let builder = builder.operator("not").text(" (");
                inner.describe_into(builder, false).text(")")
            }
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                let word = if matches!(self, Predicate::And(..)) {
                    " and "
                } else {
                    " or "
                };
                let builder = if nested { builder.text("(") } else { builder };
                let builder = left.describe_into(builder, true).operator(word);
                let builder = right.describe_into(builder, true);
                if nested {
                    builder.text(")")
                } else {
                    builder
                }
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Field(field) => write!(f, "{field}"),
            Predicate::Not(inner) => write!(f, "!{inner}"),
            Predicate::And(left, right) => write!(f, "({left} && {right})"),
            Predicate::Or(left, right) => write!(f, "({left} || {right})"),
        }
    }
}
