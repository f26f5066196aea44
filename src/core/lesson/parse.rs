//! JSON payload extraction
//!
//! Structured responses are requested as bare JSON, but models still wrap
//! them in markdown fences or surrounding prose now and then.

use std::sync::LazyLock;

use regex::Regex;

/// A fenced code block, optionally tagged `json`.
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```(?:json)?\s*(.*?)```").unwrap());

/// Locate the JSON document inside a model response.
///
/// Tries, in order: the whole text, each fenced code block, then the first
/// balanced object or array that parses.
pub fn extract_json_payload(content: &str) -> Option<serde_json::Value> {
    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return Some(value);
    }

    for block in FENCED_BLOCK.captures_iter(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(block[1].trim()) {
            return Some(value);
        }
    }

    for (idx, open) in trimmed.char_indices().filter(|(_, c)| *c == '{' || *c == '[') {
        let close = if open == '{' { '}' } else { ']' };
        let substring = &trimmed[idx..];
        if let Some(end) = balanced_end(substring, open, close) {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&substring[..=end]) {
                return Some(value);
            }
        }
    }

    None
}

/// Byte index of the bracket closing the one at position 0, ignoring brackets inside strings.
fn balanced_end(substring: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in substring.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
