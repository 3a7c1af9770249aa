//! Evaluation file locations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Eval section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// `id;query;difficulty` CSV
    #[serde(default = "default_queries_path")]
    pub queries_path: PathBuf,
    /// `id;answer` CSV
    #[serde(default = "default_answers_path")]
    pub answers_path: PathBuf,
    /// Outputs land in `<output_dir>/sql-rag` or `<output_dir>/kg-rag`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_queries_path() -> PathBuf {
    PathBuf::from("data/sample_queries.csv")
}

fn default_answers_path() -> PathBuf {
    PathBuf::from("data/answer_key.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            queries_path: default_queries_path(),
            answers_path: default_answers_path(),
            output_dir: default_output_dir(),
        }
    }
}
