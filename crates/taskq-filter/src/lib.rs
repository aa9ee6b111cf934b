//! Query filtering for structured records.
//!
//! This crate turns a single-line query such as `tag>wo && priority<5` into a
//! validated predicate tree and evaluates it against records. Every failure
//! is a [`FilterError`](filter::FilterError) carrying a styled
//! [`DiagnosticMessage`](filter::DiagnosticMessage) and the byte position it
//! refers to.
//!
//! The engine is schema driven: record types describe their fields with a
//! [`Schema`](filter::Schema) and expose values through the
//! [`Record`](filter::Record) trait.

pub mod filter;

pub use filter::{parse, FilterError, FilterResult, Predicate, Record, Schema};
