//! Description sanitization.
//!
//! Task descriptions arrive from a text input embedded in an admin dashboard,
//! so they may carry markup, control characters, or pasted whitespace runs.
//! The stored form is plain single-line text.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup tags and control characters, collapse whitespace runs to a
/// single space, and trim. Returns an empty string when nothing survives.
pub fn sanitize_description(raw: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(raw, "");
    let printable: String = stripped.chars().filter(|c| !c.is_control()).collect();
    WHITESPACE_RUN.replace_all(&printable, " ").trim().to_string()
}
