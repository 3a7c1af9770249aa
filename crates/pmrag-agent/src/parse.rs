//! Pulling statements and answers out of model output

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(?:[A-Za-z0-9_-]*\n)?(.*?)```").unwrap());

const QUERY_MARKER: &str = "SQLQuery:";
const RESULT_MARKER: &str = "SQLResult:";
const ANSWER_MARKER: &str = "final answer:";

/// Extract the statement to run from generation output
///
/// Unwraps the first fenced code block, honours a `SQLQuery:` prefix (reading up to
/// `SQLResult:`), and trims trailing semicolons. `None` when nothing is left.
pub fn extract_query(output: &str) -> Option<String> {
    let mut text = match FENCE_RE.captures(output).and_then(|c| c.get(1)) {
        Some(body) => body.as_str(),
        None => output,
    };

    if let Some(start) = text.find(QUERY_MARKER) {
        text = &text[start + QUERY_MARKER.len()..];
        if let Some(end) = text.find(RESULT_MARKER) {
            text = &text[..end];
        }
    }

    // the marker may sit outside a fence
    if let Some(body) = FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        text = body.as_str();
    }

    let query = text
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    (!query.is_empty()).then(|| query.to_string())
}

/// Extract the final answer from answer-synthesis output
///
/// Looks for `Final Answer:` in any case. Text after the first marker is returned trimmed,
/// or `"N/A"` when it is at most one character. Output without the marker is returned as-is.
pub fn parse_final_answer(output: &str) -> String {
    // ASCII lowering keeps byte offsets aligned with the original
    let lowered = output.to_ascii_lowercase();
    match lowered.find(ANSWER_MARKER) {
        Some(start) => {
            let answer = output[start + ANSWER_MARKER.len()..].trim();
            if answer.chars().count() <= 1 {
                "N/A".to_string()
            } else {
                answer.to_string()
            }
        }
        None => output.to_string(),
    }
}
