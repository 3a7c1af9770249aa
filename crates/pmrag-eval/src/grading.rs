//! Grading responses against an answer key

use std::collections::BTreeMap;

use crate::dataset::{GradedRow, QueryCase};

/// Lower-case and collapse runs of whitespace
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A response is correct when it contains the expected answer after normalization
pub fn is_correct(response: &str, expected: &str) -> bool {
    let expected = normalize(expected);
    !expected.is_empty() && normalize(response).contains(&expected)
}

/// Grade every query; missing responses and missing key entries are incorrect
pub fn grade(
    cases: &[QueryCase],
    responses: &BTreeMap<String, String>,
    answer_key: &BTreeMap<String, String>,
) -> Vec<GradedRow> {
    cases
        .iter()
        .map(|case| {
            let response = responses.get(&case.id).cloned();
            let correct = match (&response, answer_key.get(&case.id)) {
                (Some(response), Some(expected)) => is_correct(response, expected),
                _ => false,
            };
            GradedRow {
                id: case.id.clone(),
                difficulty: case.difficulty.clone(),
                response,
                correct,
            }
        })
        .collect()
}
