//! Semicolon-separated evaluation files
//!
//! | File | Columns |
//! |------|---------|
//! | queries | `id;query;difficulty` |
//! | answer key | `id;answer` |
//! | responses | `id;response` |
//! | graded | `id;difficulty;response;correct` (or just `id;difficulty;correct`) |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{EvalError, EvalResult};

const DELIMITER: u8 = b';';

/// A sample question
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryCase {
    /// Query id
    pub id: String,
    /// Natural-language question
    pub query: String,
    /// `easy` or `hard`; other values only count towards the overall bucket
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// An answer produced for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    /// Query id
    pub id: String,
    /// Answer text
    pub response: String,
}

/// A response with its verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedRow {
    /// Query id
    pub id: String,
    /// Difficulty copied from the query
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Answer text, absent when the query errored
    #[serde(default)]
    pub response: Option<String>,
    /// Verdict
    #[serde(deserialize_with = "deserialize_flag")]
    pub correct: bool,
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    id: String,
    answer: String,
}

fn reader(path: &Path) -> EvalResult<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| EvalError::csv(path, e))
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> EvalResult<Vec<T>> {
    reader(path)?
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| EvalError::csv(path, e))
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> EvalResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EvalError::io(parent, e))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(path)
        .map_err(|e| EvalError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| EvalError::csv(path, e))?;
    }
    writer.flush().map_err(|e| EvalError::io(path, e))
}

/// Read the sample questions
pub fn read_queries(path: &Path) -> EvalResult<Vec<QueryCase>> {
    read_rows(path)
}

/// Read the answer key as id to expected answer
pub fn read_answer_key(path: &Path) -> EvalResult<BTreeMap<String, String>> {
    Ok(read_rows::<AnswerRow>(path)?
        .into_iter()
        .map(|row| (row.id, row.answer))
        .collect())
}

/// Read previously written responses
pub fn read_responses(path: &Path) -> EvalResult<Vec<ResponseRow>> {
    read_rows(path)
}

/// Write responses, creating parent directories
pub fn write_responses(path: &Path, rows: &[ResponseRow]) -> EvalResult<()> {
    write_rows(path, rows)
}

/// Read graded rows
pub fn read_graded(path: &Path) -> EvalResult<Vec<GradedRow>> {
    read_rows(path)
}

/// Write graded rows, creating parent directories
pub fn write_graded(path: &Path, rows: &[GradedRow]) -> EvalResult<()> {
    write_rows(path, rows)
}

/// `True`/`False`/`1`/`0` in any case
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected True/False/1/0, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_queries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.csv");
        fs::write(
            &path,
            "id;query;difficulty\n1;How many epics are there?;easy\n2; Which goal owns EPIC-4? ;hard\n",
        )
        .unwrap();

        let cases = read_queries(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].query, "Which goal owns EPIC-4?");
        assert_eq!(cases[1].difficulty.as_deref(), Some("hard"));
    }

    #[test]
    fn test_graded_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graded.csv");
        fs::write(&path, "id;difficulty;correct\n1;easy;True\n2;hard;false\n3;easy;1\n4;hard;0\n").unwrap();

        let flags: Vec<bool> = read_graded(&path).unwrap().iter().map(|r| r.correct).collect();
        assert_eq!(flags, vec![true, false, true, false]);
    }

    #[test]
    fn test_bad_flag_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graded.csv");
        fs::write(&path, "id;difficulty;correct\n1;easy;maybe\n").unwrap();

        assert!(matches!(read_graded(&path), Err(EvalError::Csv { .. })));
    }

    #[test]
    fn test_write_responses_creates_dirs_and_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sql-rag").join("responses.csv");
        let rows = vec![ResponseRow {
            id: "1".into(),
            response: "Two epics; both open.".into(),
        }];

        write_responses(&path, &rows).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id;response\n1;\"Two epics; both open.\"\n"
        );
        assert_eq!(read_responses(&path).unwrap(), rows);
    }

    #[test]
    fn test_missing_file() {
        let err = read_queries(Path::new("/nonexistent/queries.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/queries.csv"));
    }
}
