//! String-to-value conversion helpers.
//!
//! Option arguments arrive as raw strings; this module is the single place
//! that decides whether such a string is a well-formed integer, float or
//! boolean, and performs the conversions used for typed variable bindings.

use crate::spec::ValueKind;

/// Parses an integer argument. Surrounding whitespace is tolerated.
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parses a float argument. Surrounding whitespace is tolerated.
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Parses a boolean argument.
///
/// Accepts the usual command-line spellings: `1`/`0`, `true`/`false`,
/// `yes`/`no` and `on`/`off` (case-insensitive).
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Checks whether `text` is parseable as `kind`.
///
/// `None` and `String` kinds accept any text.
pub fn matches_kind(kind: ValueKind, text: &str) -> bool {
    match kind {
        ValueKind::Integer => parse_integer(text).is_some(),
        ValueKind::Float => parse_float(text).is_some(),
        ValueKind::Boolean => parse_boolean(text).is_some(),
        ValueKind::None | ValueKind::String => true,
    }
}
