//! Tokenizer (lexer) for filter queries.
//!
//! The tokenizer walks a borrowed query string with an explicit cursor. The
//! caller decides how the next token is read: as a plain word (whitespace
//! delimited, or a quoted phrase), as a word that also stops at caller-chosen
//! delimiters, or as a regular-expression match anchored at the cursor.
//!
//! A failed read never moves the cursor, so a caller can try one production,
//! fall back to another, and observe exactly the same state as if the first
//! attempt had not been made.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use regex::Regex;

/// Error encountered while scanning a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// No characters remain that could form the requested token.
    EndOfString {
        /// Byte offset where the input ran out.
        position: usize,
        /// Byte offset of an opening quote that was never closed.
        open_quote: Option<usize>,
    },

    /// Characters remain, but the one at the cursor does not satisfy the
    /// requested pattern or predicate.
    NoMatchableCharacter {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
}

impl TokenizeError {
    /// Returns the byte offset the error refers to.
    pub fn position(&self) -> usize {
        match self {
            TokenizeError::EndOfString { position, .. }
            | TokenizeError::NoMatchableCharacter { position, .. } => *position,
        }
    }

    /// Returns true for the end-of-string kind.
    pub fn is_end_of_string(&self) -> bool {
        matches!(self, TokenizeError::EndOfString { .. })
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::EndOfString {
                open_quote: Some(quote),
                ..
            } => write!(f, "unterminated quote starting at position {}", quote),
            TokenizeError::EndOfString { position, .. } => {
                write!(f, "unexpected end of input at position {}", position)
            }
            TokenizeError::NoMatchableCharacter { position, found } => {
                write!(f, "unexpected character '{}' at position {}", found, position)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

/// A specialized Result type for tokenizer reads.
pub type TokenizeResult<T> = Result<T, TokenizeError>;

/// A token with its position in the input.
///
/// The text borrows from the source unless the token is a quoted phrase
/// containing escape sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    text: Cow<'a, str>,
    start: usize,
    end: usize,
    quoted: bool,
}

impl<'a> Token<'a> {
    fn new(text: Cow<'a, str>, span: Range<usize>, quoted: bool) -> Self {
        Self {
            text,
            start: span.start,
            end: span.end,
            quoted,
        }
    }

    /// The token text, with quote delimiters stripped.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the first character of the token (including an opening quote).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the token (including a closing quote).
    pub fn end(&self) -> usize {
        self.end
    }

    /// The `[start, end)` range of the token in the source.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true if the token was written as a quoted phrase.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Consumes the token, returning its text.
    pub fn into_text(self) -> Cow<'a, str> {
        self.text
    }
}

/// Scanning state of a [`Tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCursor {
    offset: usize,
    len: usize,
    exhausted: bool,
}

impl TokenCursor {
    fn new(len: usize) -> Self {
        Self {
            offset: 0,
            len,
            exhausted: len == 0,
        }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true once the cursor has reached the end of the source.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance_to(&mut self, offset: usize) {
        assert!(
            offset >= self.offset && offset <= self.len,
            "token cursor moved from {} to {} in a source of length {}",
            self.offset,
            offset,
            self.len
        );
        self.offset = offset;
        self.exhausted = offset == self.len;
    }
}

/// A regular expression that only ever matches at the cursor.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
    source: String,
}

impl TokenPattern {
    /// Compiles a pattern. The expression is anchored at the cursor, so it
    /// never searches ahead in the input.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error if `pattern` is not a valid expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"\A(?:{pattern})"))?;
        Ok(Self {
            regex,
            source: pattern.to_string(),
        })
    }

    /// The pattern as written, without the anchor.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Length of the match at the start of `rest`. Empty matches do not count.
    fn match_len(&self, rest: &str) -> Option<usize> {
        self.regex
            .find(rest)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }
}

/// Tokenizer over a borrowed query string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    cursor: TokenCursor,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input string.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: TokenCursor::new(source.len()),
        }
    }

    /// The string being tokenized.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.cursor.offset()
    }

    /// Snapshot of the scanning state.
    pub fn cursor(&self) -> TokenCursor {
        self.cursor
    }

    /// Offset where the next token starts: the first non-whitespace
    /// character at or after the cursor, or the end of the source.
    pub fn token_start(&self) -> usize {
        let rest = &self.source[self.cursor.offset()..];
        self.cursor.offset() + (rest.len() - rest.trim_start().len())
    }

    /// Returns true if any non-whitespace character remains.
    pub fn has_more_tokens(&self) -> bool {
        self.token_start() < self.source.len()
    }

    /// Returns the next non-whitespace character without consuming anything.
    pub fn peek_char(&self) -> Option<char> {
        self.source[self.token_start()..].chars().next()
    }

    /// Reads the next plain word or quoted phrase.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::EndOfString`] if only whitespace remains or a
    /// quoted phrase is never closed.
    pub fn next_word(&mut self) -> TokenizeResult<Token<'a>> {
        self.next_word_until(|_| false)
    }

    /// Reads the next word, like [`next_word`](Self::next_word), except that an
    /// unquoted word also ends before any character for which `stop` returns
    /// true. Quoted phrases are not affected by `stop`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::NoMatchableCharacter`] if the first character
    /// is itself a stop character, and [`TokenizeError::EndOfString`] as for
    /// `next_word`.
    pub fn next_word_until<F>(&mut self, stop: F) -> TokenizeResult<Token<'a>>
    where
        F: Fn(char) -> bool,
    {
        let start = self.token_start();
        let Some(first) = self.source[start..].chars().next() else {
            return Err(TokenizeError::EndOfString {
                position: start,
                open_quote: None,
            });
        };

        let token = if first == '"' || first == '\'' {
            self.read_quoted(start, first)?
        } else if stop(first) {
            return Err(TokenizeError::NoMatchableCharacter {
                position: start,
                found: first,
            });
        } else {
            self.read_bare(start, &stop)
        };

        self.cursor.advance_to(token.end());
        Ok(token)
    }

    /// Reads the next plain word, returning `None` if the input is exhausted.
    ///
    /// # Errors
    ///
    /// An unterminated quoted phrase is still reported as an error.
    pub fn try_next_word(&mut self) -> TokenizeResult<Option<Token<'a>>> {
        if !self.has_more_tokens() {
            return Ok(None);
        }
        self.next_word().map(Some)
    }

    /// Reads a token matching `pattern` at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::EndOfString`] if only whitespace remains, or
    /// [`TokenizeError::NoMatchableCharacter`] if the pattern does not match at
    /// the cursor. The cursor is unchanged in both cases.
    pub fn next_pattern(&mut self, pattern: &TokenPattern) -> TokenizeResult<Token<'a>> {
        let start = self.token_start();
        let rest = &self.source[start..];
        let Some(first) = rest.chars().next() else {
            return Err(TokenizeError::EndOfString {
                position: start,
                open_quote: None,
            });
        };

        let len = pattern
            .match_len(rest)
            .ok_or(TokenizeError::NoMatchableCharacter {
                position: start,
                found: first,
            })?;

        self.cursor.advance_to(start + len);
        Ok(Token::new(
            Cow::Borrowed(&rest[..len]),
            start..start + len,
            false,
        ))
    }

    /// Reads a token matching `pattern`, or returns `None` without moving.
    pub fn try_next_pattern(&mut self, pattern: &TokenPattern) -> Option<Token<'a>> {
        self.next_pattern(pattern).ok()
    }

    /// Collects all remaining words and quoted phrases.
    ///
    /// # Errors
    ///
    /// Fails on the first unterminated quoted phrase.
    pub fn to_list(self) -> TokenizeResult<Vec<Token<'a>>> {
        self.collect()
    }

    /// Reads an unquoted word starting at `start`.
    fn read_bare<F>(&self, start: usize, stop: &F) -> Token<'a>
    where
        F: Fn(char) -> bool,
    {
        let rest = &self.source[start..];
        let len = rest
            .find(|c: char| c.is_whitespace() || stop(c))
            .unwrap_or(rest.len());
        Token::new(Cow::Borrowed(&rest[..len]), start..start + len, false)
    }

    /// Reads a quoted phrase whose opening `quote` sits at `start`.
    ///
    /// A backslash escapes the following character. The text stays borrowed
    /// unless an escape forces a copy.
    fn read_quoted(&self, start: usize, quote: char) -> TokenizeResult<Token<'a>> {
        let body_start = start + quote.len_utf8();
        let body = &self.source[body_start..];

        let mut unescaped: Option<String> = None;
        let mut chars = body.char_indices();
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                let buf = unescaped.get_or_insert_with(|| body[..i].to_string());
                match chars.next() {
                    Some((_, escaped)) => buf.push(escaped),
                    None => break,
                }
            } else if c == quote {
                let text = match unescaped {
                    Some(owned) => Cow::Owned(owned),
                    None => Cow::Borrowed(&body[..i]),
                };
                let end = body_start + i + quote.len_utf8();
                return Ok(Token::new(text, start..end, true));
            } else if let Some(buf) = unescaped.as_mut() {
                buf.push(c);
            }
        }

        Err(TokenizeError::EndOfString {
            position: self.source.len(),
            open_quote: Some(start),
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = TokenizeResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next_word() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                // Stop after the first failure.
                self.cursor.advance_to(self.source.len());
                Some(Err(e))
            }
        }
    }
}
