//! Extraction and best-effort repair of the JSON object embedded in
//! generated text.
//!
//! Generation output routinely wraps the payload in prose or markdown fences
//! and is occasionally truncated mid-array. The repair step is deliberately
//! a standalone pure function: trim to the last complete element, then
//! re-close the open delimiters. Failure after repair is an explicit error,
//! never an empty success.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{GenerationPayload, SuggestError};

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?)\s*```").expect("fence regex is valid")
});

/// Locate the JSON object inside possibly surrounding prose or markdown
/// fences. Returns the candidate substring without validating it.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    if let Some(captures) = FENCE_RE.captures(text) {
        return Some(captures.get(1).expect("fence capture group").as_str());
    }
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        // Truncated before any closing brace; hand the tail to the repairer.
        _ => Some(&text[start..]),
    }
}

/// Open delimiters of `s`, outermost first. `None` when `s` ends inside a
/// string literal (nothing sensible to close).
fn open_delimiters(s: &str) -> Option<Vec<char>> {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => stack.push(c),
            '}' | ']' if !in_string => {
                stack.pop();
            }
            _ => {}
        }
    }
    if in_string { None } else { Some(stack) }
}

/// Attempt to repair truncated JSON by trimming to the last position where
/// a complete element closed near the top level, then re-closing whatever
/// remains open. Returns `None` when the input is already balanced (repair
/// cannot help) or when no complete element exists to trim to.
pub fn repair_truncated_json(s: &str) -> Option<String> {
    let mut in_string = false;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut last_element_end: Option<usize> = None;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => {
                depth = depth.saturating_sub(1);
                // Depth 2 is an element of the top-level object's array.
                if depth <= 2 {
                    last_element_end = Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    if !in_string && depth == 0 {
        return None; // balanced, malformed for some other reason
    }

    let end = last_element_end?;
    let trimmed = &s[..end];
    let mut repaired = trimmed.to_string();
    for open in open_delimiters(trimmed)?.into_iter().rev() {
        repaired.push(match open {
            '{' => '}',
            _ => ']',
        });
    }
    debug!(
        original_len = s.len(),
        repaired_len = repaired.len(),
        "repaired truncated generation payload"
    );
    Some(repaired)
}

/// Parse the generation text into a payload, attempting repair before
/// giving up. All failure paths are explicit error variants.
pub fn parse_generation(text: &str) -> Result<GenerationPayload, SuggestError> {
    let candidate = extract_json_payload(text).ok_or(SuggestError::MissingPayload)?;
    match serde_json::from_str::<GenerationPayload>(candidate) {
        Ok(payload) => Ok(payload),
        Err(first_error) => {
            let repaired = repair_truncated_json(candidate)
                .ok_or_else(|| SuggestError::MalformedGeneration(first_error.to_string()))?;
            serde_json::from_str(&repaired)
                .map_err(|e| SuggestError::MalformedGeneration(e.to_string()))
        }
    }
}
