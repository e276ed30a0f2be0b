//! `.env` line parser.
//!
//! Format, one assignment per line:
//!
//! ```text
//! # full-line comment
//! KEY=value
//! QUOTED="value with \"escaped\" quotes"
//! SINGLE='a\\b'
//! ```
//!
//! Lines without `=` or with an empty key are ignored. Only full-line
//! comments exist; a `#` after the value is part of the value.

use crate::scanner::RawDefinition;

/// Parse one line into `(key, value)`.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (key, raw_value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = unescape(strip_quotes(raw_value.trim()));
    Some((key.to_string(), value.trim().to_string()))
}

/// Parse a whole file. Definitions keep file order.
pub fn parse_env(content: &str, source: &str) -> Vec<RawDefinition> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            parse_line(line).map(|(key, value)| RawDefinition {
                key,
                value,
                source: source.to_string(),
                line: i + 1,
            })
        })
        .collect()
}

/// Remove one layer of matching `"` or `'`.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Single left-to-right pass over `\"`, `\'` and `\\`. Other backslashes stay.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\'' | '\\') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
