//! Extraction of structured room records from raw model responses.
//!
//! Vision models rarely answer with clean JSON: the array is usually wrapped
//! in a fenced code block and surrounded by prose ("Here are the rooms: ...").
//! [`extract_records`] locates the first span that actually parses as a JSON
//! array and returns its elements as loosely-typed records, leaving per-record
//! shape checks to the validator.
//!
//! Candidate spans are tried in order:
//!
//! 1. Fenced code blocks (```` ```json ... ``` ````, label optional)
//! 2. Bracket-balanced array spans, scanned left to right
//!
//! The first candidate that parses wins. Pure function: no I/O, no state.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    // (?s) so the body may span lines; non-greedy so multiple blocks each match
    Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").expect("fenced block pattern is valid")
});

/// Extract the first parseable JSON array from a raw model response.
///
/// Returns the array's elements as generic [`Value`] records. Elements are
/// not required to be objects here; rejecting non-record elements is the
/// validator's job.
///
/// # Errors
///
/// [`Error::Extraction`] when no candidate span parses as a JSON array. This
/// is recoverable by design: callers treat it as "zero rooms detected".
///
/// # Example
///
/// ```rust
/// use roomiq::extract_records;
///
/// let text = "Here are the rooms:\n```json\n[{\"id\":\"r1\",\"bounding_box\":[10,10,20,20]}]\n```\nDone.";
/// let records = extract_records(text).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0]["id"], "r1");
/// ```
pub fn extract_records(text: &str) -> Result<Vec<Value>> {
    for candidate in candidate_spans(text) {
        if let Ok(Value::Array(records)) = serde_json::from_str::<Value>(candidate) {
            return Ok(records);
        }
    }

    Err(Error::extraction(
        "no parseable JSON array found in model response",
    ))
}

/// Collect candidate array spans: fenced blocks first, then bare balanced
/// spans in document order.
fn candidate_spans(text: &str) -> Vec<&str> {
    let mut candidates: Vec<&str> = FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect();

    candidates.extend(balanced_array_spans(text));
    candidates
}

/// Scan for bracket-balanced `[...]` spans at the top level of the text.
///
/// The scan is string-aware (brackets inside JSON string literals do not
/// count) so nested arrays like `"bounding_box": [10, 10, 20, 20]` close at
/// the right depth. A naive non-greedy regex truncates these.
fn balanced_array_spans(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'[' {
            pos += 1;
            continue;
        }

        match balanced_end(bytes, pos) {
            Some(end) => {
                spans.push(&text[pos..=end]);
                // Resume after the span; its nested arrays are not top-level
                pos = end + 1;
            }
            None => {
                pos += 1;
            }
        }
    }

    spans
}

/// Find the byte index of the `]` closing the `[` at `start`, honoring JSON
/// string literals and escape sequences. Returns `None` when unbalanced.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
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
            b'[' => depth += 1,
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
