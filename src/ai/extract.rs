//! Best-effort JSON extraction from model output
//!
//! Models wrap answers in prose or markdown fences, so the reply is scanned
//! for the first balanced object or array that actually parses, and only then
//! checked for the expected shape.

use serde_json::Value;

use crate::names::VariantSet;

/// Only this much of a reply is scanned; nickname answers are tiny
pub const MAX_SCAN_BYTES: usize = 16 * 1024;

/// Find the first balanced `{...}` or `[...]` substring of `text` that parses
///
/// Brackets inside string literals are ignored. Candidates that are balanced
/// but not valid JSON are skipped in favor of later ones. Anything past
/// [`MAX_SCAN_BYTES`] is ignored.
pub fn extract_json(text: &str) -> Option<Value> {
    let text = scan_window(text);
    let bytes = text.as_bytes();
    let mut from = 0;

    while from < bytes.len() {
        let offset = bytes[from..].iter().position(|&b| b == b'{' || b == b'[')?;
        let start = from + offset;

        if let Some(end) = balanced_end(bytes, start) {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                return Some(value);
            }
        }
        from = start + 1;
    }

    None
}

/// Longest prefix of `text` within the scan cap, cut on a char boundary
fn scan_window(text: &str) -> &str {
    if text.len() <= MAX_SCAN_BYTES {
        return text;
    }
    let mut end = MAX_SCAN_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Index of the bracket closing the one at `start`, if the brackets balance
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(b) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Read names out of an extracted value
///
/// Accepts a bare array of strings or `{"canonical": ..., "nicknames": [...]}`.
/// Non-string items are ignored. The queried `name` is always part of the
/// result, but only names contributed by the model count: `None` means the
/// value carried nothing usable.
pub fn parse_names(value: &Value, name: &str) -> Option<VariantSet> {
    let mut found = VariantSet::new();

    match value {
        Value::Array(items) => {
            found.extend(items.iter().filter_map(Value::as_str));
        }
        Value::Object(map) => {
            if let Some(canonical) = map.get("canonical").and_then(Value::as_str) {
                found.insert(canonical);
            }
            if let Some(Value::Array(nicknames)) = map.get("nicknames") {
                found.extend(nicknames.iter().filter_map(Value::as_str));
            }
        }
        _ => {}
    }

    if found.is_empty() {
        return None;
    }

    let mut names = VariantSet::new();
    names.insert(name);
    names.extend(found);
    Some(names)
}
