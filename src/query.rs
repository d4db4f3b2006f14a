// src/query.rs

//! Parsing of the long-poll `?t=<integer>` baseline for the HTTP layer.
//!
//! The coordinator only ever sees a valid [`Timestamp`]; rejecting bad input
//! with a client error is the caller's job, and this is the helper for it.

use crate::engine::Timestamp;
use crate::errors::InvalidBaseline;

/// Parse the `t` query value.
///
/// Accepts decimal, `0x` hex, `0o` or leading-`0` octal and `0b` binary, with
/// an optional `+`. `_` may separate digits, or follow a radix prefix
/// (`1_000`, `0x_1F`). Negative values, empty input and anything else are
/// rejected.
pub fn parse_baseline(raw: Option<&str>) -> Result<Timestamp, InvalidBaseline> {
    let value = match raw {
        Some(v) if !v.is_empty() => v,
        _ => return Err(InvalidBaseline::Missing),
    };

    let malformed = |reason: &str| InvalidBaseline::Malformed {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.starts_with('-') {
        return Err(malformed("baseline must not be negative"));
    }
    let unsigned = value.strip_prefix('+').unwrap_or(value);

    let (digits, radix) = split_radix(unsigned);
    let prefixed = digits.len() < unsigned.len();
    if digits.is_empty() || !digits.chars().all(|c| c == '_' || c.is_digit(radix)) {
        return Err(malformed("not an integer"));
    }
    if !separators_ok(digits, prefixed) {
        return Err(malformed("misplaced '_' separator"));
    }

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    Timestamp::from_str_radix(&digits, radix).map_err(|e| malformed(&e.to_string()))
}

/// Every `_` must sit between two digits, a radix prefix counting as one.
fn separators_ok(digits: &str, prefixed: bool) -> bool {
    let mut after_digit = prefixed;
    for c in digits.chars() {
        if c == '_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
        } else {
            after_digit = true;
        }
    }
    after_digit
}

fn split_radix(s: &str) -> (&str, u32) {
    let lower = s.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (&s[2..], 16),
        Some("0o") => (&s[2..], 8),
        Some("0b") => (&s[2..], 2),
        _ if s.len() > 1 && s.starts_with('0') => (&s[1..], 8),
        _ => (s, 10),
    }
}
