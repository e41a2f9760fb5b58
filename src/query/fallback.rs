//! Hyphen fallback for compact road names
//!
//! Road names in the service are stored hyphenated ("A-1", "N-340"). When a
//! search for a compact spelling like "A1" finds nothing it is retried once
//! with a hyphen between the leading letters and the digits.

use regex::Regex;
use std::sync::LazyLock;

static LETTERS_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z]+)([0-9]+)").expect("valid regex"));

/// Rewrite the first letters-then-digits run as `letters-digits`
///
/// Returns `None` when the input has no such run, including names that are
/// already separated ("N-340").
pub fn fallback_road_name(carretera: &str) -> Option<String> {
    if !LETTERS_DIGITS_RE.is_match(carretera) {
        return None;
    }
    Some(LETTERS_DIGITS_RE.replace(carretera, "$1-$2").into_owned())
}
