//! Column-level predicates.
//!
//! Every function here looks at the text of one column (or one line) and answers pass or fail.
//! They carry no state and report nothing; the line checker decides which error each failure maps to.

use crate::gffcheck_utils::{GFF3_HEADER, NUM_FIELDS};
use crate::options::CoordinateRule;

/// Characters allowed in identifiers, sources and attribute keys: `[A-Za-z0-9.=;_]`.
fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '=' | ';' | '_')
}

/// Returns `true` if every character of `text` is one of `[A-Za-z0-9.=;_]`.
/// The empty string passes.
pub fn char_check(text: &str) -> bool {
    text.chars().all(is_allowed_char)
}

/// Column 1.
pub fn valid_seqid(text: &str) -> bool {
    char_check(text)
}

/// Column 2.
pub fn valid_source(text: &str) -> bool {
    char_check(text)
}

/// Column 3: `text` must be one of `types`.
///
/// The line checker passes the active type hierarchy; tests can pass any override set.
pub fn valid_type<T: AsRef<str>>(text: &str, types: &[T]) -> bool {
    types.iter().any(|t| t.as_ref() == text)
}

/// Columns 4 and 5: digits only, no sign or decimal point, and strictly positive.
pub fn valid_coordinate(text: &str) -> bool {
    !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && text.bytes().any(|b| b != b'0')
}

/// Columns 4 and 5 together: both valid and ordered according to `rule`.
pub fn valid_coordinates(left: &str, right: &str, rule: CoordinateRule) -> bool {
    if !(valid_coordinate(left) && valid_coordinate(right)) {
        return false;
    }
    match (left.parse::<u64>(), right.parse::<u64>()) {
        (Ok(l), Ok(r)) => match rule {
            CoordinateRule::Lenient => l <= r,
            CoordinateRule::Strict => l < r,
        },
        _ => false,
    }
}

/// Column 6: `.` or a floating point number.
pub fn valid_score(text: &str) -> bool {
    text == "." || text.parse::<f64>().is_ok()
}

/// Column 7: one of `+`, `-`, `.`, `?`.
pub fn valid_strand(text: &str) -> bool {
    matches!(text, "+" | "-" | "." | "?")
}

/// Column 8: one of `.`, `0`, `1`, `2`.
pub fn valid_phase(text: &str) -> bool {
    matches!(text, "." | "0" | "1" | "2")
}

/// Column 9: a `;` separated list of `key=value` entries.
///
/// An empty string or `.` means no attributes. Empty segments (trailing or doubled `;`) are
/// skipped. Every other segment must contain exactly one `=`, a non-empty key passing
/// [char_check], and a value passing [char_check] once its spaces are removed.
pub fn valid_attributes(attributes: &str) -> bool {
    if attributes.is_empty() || attributes == "." {
        return true;
    }

    attributes
        .split(';')
        .filter(|seg| !seg.is_empty())
        .all(|seg| {
            if seg.matches('=').count() != 1 {
                return false;
            }
            match seg.split_once('=') {
                Some((key, value)) => {
                    !key.is_empty() && char_check(key) && char_check(&value.replace(' ', ""))
                }
                None => false,
            }
        })
}

/// A line has a valid tab structure if it splits into exactly 9 columns.
pub fn valid_tab_structure(line: &str) -> bool {
    line.split('\t').count() == NUM_FIELDS
}

/// Returns `true` if `line` is exactly the `##gff-version 3` header.
pub fn valid_header(line: &str) -> bool {
    line == GFF3_HEADER
}
