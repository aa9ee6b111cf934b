//! Record schemas: which fields a query may name and how each is compared.
//!
//! The filter engine never knows the concrete record type. A record model
//! describes its filterable fields with a [`Schema`] and exposes field values
//! through the [`Record`] trait.

use chrono::NaiveDate;
use serde::Serialize;
use strsim::levenshtein;

use super::operator::FilterOperator;

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A single string.
    Text,
    /// A set of strings, such as tags.
    TextSet,
    /// A calendar date.
    Date,
    /// An integer.
    Number,
}

impl FieldKind {
    /// Returns true for kinds compared by natural ordering.
    pub fn is_ordered(self) -> bool {
        matches!(self, FieldKind::Date | FieldKind::Number)
    }

    /// Lower-case name used in listings.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextSet => "text set",
            FieldKind::Date => "date",
            FieldKind::Number => "number",
        }
    }
}

/// Extra syntax rule a test phrase must satisfy.
pub type PhraseValidator = fn(&str) -> bool;

/// Description of one filterable field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    aliases: Vec<String>,
    kind: FieldKind,
    operators: Vec<FilterOperator>,
    convenience: FilterOperator,
    set_filterable: bool,
    validator: Option<PhraseValidator>,
    phrase_hint: Option<String>,
    description: String,
}

impl FieldSpec {
    /// Creates a field with the default operators for its kind.
    ///
    /// Text fields support all four operators; ordered fields support
    /// `=`, `<` and `>` only. The convenience form means `>` until
    /// [`with_convenience`](Self::with_convenience) says otherwise.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let operators = if kind.is_ordered() {
            vec![
                FilterOperator::Equal,
                FilterOperator::Less,
                FilterOperator::Greater,
            ]
        } else {
            FilterOperator::ALL.to_vec()
        };

        Self {
            name: name.into(),
            aliases: Vec::new(),
            kind,
            operators,
            convenience: FilterOperator::Greater,
            set_filterable: false,
            validator: None,
            phrase_hint: None,
            description: String::new(),
        }
    }

    /// Adds an alternative name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Replaces the supported operators.
    pub fn with_operators(mut self, operators: &[FilterOperator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    /// Declares what the convenience form means for this field and enables it.
    ///
    /// Passing [`FilterOperator::Convenience`] itself keeps the `>` default.
    pub fn with_convenience(mut self, meaning: FilterOperator) -> Self {
        if meaning != FilterOperator::Convenience {
            self.convenience = meaning;
        }
        if !self.operators.contains(&FilterOperator::Convenience) {
            self.operators.push(FilterOperator::Convenience);
        }
        self
    }

    /// Allows or forbids bracketed phrase sets for this field.
    pub fn set_filterable(mut self, allowed: bool) -> Self {
        self.set_filterable = allowed;
        self
    }

    /// Adds a syntax rule for test phrases, with a hint shown when it fails.
    pub fn with_validator(mut self, validator: PhraseValidator, hint: impl Into<String>) -> Self {
        self.validator = Some(validator);
        self.phrase_hint = Some(hint.into());
        self
    }

    /// Sets a one-line description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Canonical field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Semantic type.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Supported operators.
    pub fn operators(&self) -> &[FilterOperator] {
        &self.operators
    }

    /// Returns true if the field accepts `operator`.
    pub fn supports(&self, operator: FilterOperator) -> bool {
        self.operators.contains(&operator)
    }

    /// The operator the convenience form stands for.
    pub fn convenience_operator(&self) -> FilterOperator {
        self.convenience
    }

    /// Maps the convenience form to its meaning; other operators are unchanged.
    pub fn effective_operator(&self, operator: FilterOperator) -> FilterOperator {
        match operator {
            FilterOperator::Convenience => self.convenience,
            other => other,
        }
    }

    /// Returns true if bracketed phrase sets are allowed.
    pub fn is_set_filterable(&self) -> bool {
        self.set_filterable
    }

    /// Runs the field's own phrase rule. Fields without one accept anything.
    pub fn accepts_phrase(&self, phrase: &str) -> bool {
        self.validator.map_or(true, |validate| validate(phrase))
    }

    /// Describes what a valid phrase looks like, if the field has a rule.
    pub fn phrase_hint(&self) -> Option<&str> {
        self.phrase_hint.as_deref()
    }

    /// One-line description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if `key` names this field or one of its aliases (case-insensitive).
    pub fn matches_key(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
    }
}

/// The filterable fields of a record type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// All fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by name or alias (case-insensitive).
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.matches_key(key))
    }

    /// Suggests the canonical name of the field closest to an unknown key.
    pub fn suggest(&self, key: &str) -> Option<&str> {
        let key_lower = key.to_lowercase();

        let (best, distance) = self
            .fields
            .iter()
            .flat_map(|f| {
                std::iter::once(f.name.as_str())
                    .chain(f.aliases.iter().map(String::as_str))
                    .map(move |candidate| (f.name.as_str(), candidate))
            })
            .map(|(name, candidate)| (name, levenshtein(&key_lower, &candidate.to_lowercase())))
            .min_by_key(|(_, d)| *d)?;

        (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE && distance < key.len())
            .then_some(best)
    }
}

/// A field value read from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'r> {
    /// A single string.
    Text(&'r str),
    /// A set of strings.
    TextSet(&'r [String]),
    /// A calendar date.
    Date(NaiveDate),
    /// An integer.
    Number(i64),
}

/// Read access to the filterable fields of a record.
pub trait Record {
    /// Returns the value of the field with the given canonical name, or
    /// `None` if the record has no value for it.
    fn field_value(&self, field: &str) -> Option<FieldValue<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        (**self).field_value(field)
    }
}
