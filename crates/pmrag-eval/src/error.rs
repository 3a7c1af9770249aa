//! Error types for evaluation

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing evaluation files
#[derive(Debug, Error)]
pub enum EvalError {
    /// File could not be opened or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: csv::Error,
    },

    /// Metrics could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;
