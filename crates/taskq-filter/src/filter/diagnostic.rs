//! Structured, style-tagged messages.
//!
//! A [`DiagnosticMessage`] is plain data: an ordered list of text segments,
//! each tagged with a semantic [`Style`]. Renderers decide what a style looks
//! like; concatenating the segment texts gives the plain-text form.

use std::fmt;

use serde::Serialize;

/// Semantic role of a message segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Ordinary text.
    Default,
    /// The part of the message that states what went wrong.
    Error,
    /// A field name.
    Field,
    /// An operator symbol or its meaning.
    Operator,
    /// A test phrase or other user-supplied value.
    Phrase,
    /// A position in the query string.
    Position,
    /// A suggestion for fixing the input.
    Hint,
    /// A highlighted search match.
    Match,
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    text: String,
    style: Style,
}

impl Segment {
    /// The segment text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The segment style.
    pub fn style(&self) -> Style {
        self.style
    }
}

/// An immutable message made of styled segments.
///
/// Messages are assembled with a [`DiagnosticBuilder`]; once built they
/// cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiagnosticMessage {
    segments: Vec<Segment>,
}

impl DiagnosticMessage {
    /// Starts building a message.
    pub fn builder() -> DiagnosticBuilder {
        DiagnosticBuilder::default()
    }

    /// A message consisting of a single unstyled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::builder().text(text).build()
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the message has no text.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenates all segment texts.
    pub fn to_plain_text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Marks every case-insensitive occurrence of `needle` in `text` with
    /// [`Style::Match`]. Case is folded with Unicode lowercasing, the same
    /// folding [`contains_ignore_case`] uses.
    pub fn highlight(text: &str, needle: &str) -> Self {
        let mut builder = Self::builder();
        let needle = fold(needle);
        if needle.is_empty() {
            return builder.text(text).build();
        }

        let mut plain_start = 0;
        let mut search_from = 0;
        for (i, _) in text.char_indices() {
            if i < search_from {
                continue;
            }
            if let Some(len) = folded_match_len(&text[i..], &needle) {
                builder = builder
                    .text(&text[plain_start..i])
                    .styled(Style::Match, &text[i..i + len]);
                plain_start = i + len;
                search_from = plain_start;
            }
        }
        builder.text(&text[plain_start..]).build()
    }
}

/// Returns true if `needle` occurs in `text`, ignoring case.
///
/// Matches start and end on character boundaries of `text`, so this agrees
/// with [`DiagnosticMessage::highlight`] about what counts as a match.
pub fn contains_ignore_case(text: &str, needle: &str) -> bool {
    let needle = fold(needle);
    needle.is_empty()
        || text
            .char_indices()
            .any(|(i, _)| folded_match_len(&text[i..], &needle).is_some())
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Byte length of the shortest prefix of `rest` whose lowercase form is
/// exactly `needle`.
fn folded_match_len(rest: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (i, c) in rest.char_indices() {
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(i + c.len_utf8());
        }
    }
    None
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

/// Builder for [`DiagnosticMessage`].
///
/// Empty texts are dropped and adjacent segments with the same style are
/// merged.
#[derive(Debug, Default)]
#[must_use]
pub struct DiagnosticBuilder {
    segments: Vec<Segment>,
}

impl DiagnosticBuilder {
    /// Appends text with the given style.
    pub fn styled(mut self, style: Style, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.segments.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.segments.push(Segment { text, style }),
        }
        self
    }

    /// Appends unstyled text.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.styled(Style::Default, text)
    }

    /// Appends error text.
    pub fn error(self, text: impl Into<String>) -> Self {
        self.styled(Style::Error, text)
    }

    /// Appends a field name.
    pub fn field(self, text: impl Into<String>) -> Self {
        self.styled(Style::Field, text)
    }

    /// Appends an operator.
    pub fn operator(self, text: impl Into<String>) -> Self {
        self.styled(Style::Operator, text)
    }

    /// Appends a quoted phrase.
    pub fn phrase(self, text: impl AsRef<str>) -> Self {
        self.styled(Style::Phrase, format!("'{}'", text.as_ref()))
    }

    /// Appends " at position N".
    pub fn position(self, position: usize) -> Self {
        self.text(" at position ")
            .styled(Style::Position, position.to_string())
    }

    /// Appends a hint.
    pub fn hint(self, text: impl Into<String>) -> Self {
        self.styled(Style::Hint, text)
    }

    /// Appends all segments of another message.
    pub fn append(self, message: &DiagnosticMessage) -> Self {
        message
            .segments
            .iter()
            .fold(self, |builder, segment| {
                builder.styled(segment.style, segment.text.clone())
            })
    }

    /// Finishes the message.
    pub fn build(self) -> DiagnosticMessage {
        DiagnosticMessage {
            segments: self.segments,
        }
    }
}
