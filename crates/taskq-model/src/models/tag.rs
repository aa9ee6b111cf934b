//! Tag syntax.

/// Returns true if `name` is a valid tag: non-empty, made only of letters,
/// digits, `-` and `_`.
///
/// The same rule checks stored tags and `tag` phrases in queries.
pub fn is_valid_tag(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}
