//! Accuracy overall and per difficulty

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::dataset::GradedRow;
use crate::error::{EvalError, EvalResult};

/// Counts for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketMetrics {
    /// Rows in the bucket
    pub num_queries: usize,
    /// Rows graded correct
    pub num_correct: usize,
    /// `num_correct / num_queries`, `None` for an empty bucket
    pub accuracy: Option<f64>,
}

impl BucketMetrics {
    fn add(&mut self, correct: bool) {
        self.num_queries += 1;
        if correct {
            self.num_correct += 1;
        }
    }

    fn finish(mut self) -> Self {
        self.accuracy =
            (self.num_queries > 0).then(|| self.num_correct as f64 / self.num_queries as f64);
        self
    }
}

/// Metrics persisted after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    /// Every graded row
    pub overall: BucketMetrics,
    /// Rows with difficulty `easy`
    pub easy: BucketMetrics,
    /// Rows with difficulty `hard`
    pub hard: BucketMetrics,
    /// When the metrics were computed
    pub generated_at: DateTime<Utc>,
}

impl EvalMetrics {
    /// Aggregate graded rows; difficulty matches case-insensitively
    pub fn from_graded(rows: &[GradedRow]) -> Self {
        let mut overall = BucketMetrics::default();
        let mut easy = BucketMetrics::default();
        let mut hard = BucketMetrics::default();

        for row in rows {
            overall.add(row.correct);
            match row.difficulty.as_deref().map(str::to_ascii_lowercase).as_deref() {
                Some("easy") => easy.add(row.correct),
                Some("hard") => hard.add(row.correct),
                _ => {}
            }
        }

        Self {
            overall: overall.finish(),
            easy: easy.finish(),
            hard: hard.finish(),
            generated_at: Utc::now(),
        }
    }

    /// Write as pretty JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> EvalResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| EvalError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| EvalError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(difficulty: &str, correct: bool) -> GradedRow {
        GradedRow {
            id: "x".into(),
            difficulty: Some(difficulty.into()),
            response: None,
            correct,
        }
    }

    #[test]
    fn test_buckets() {
        let rows = vec![
            row("easy", true),
            row("Easy", false),
            row("hard", true),
            row("medium", true),
        ];
        let metrics = EvalMetrics::from_graded(&rows);

        assert_eq!(metrics.overall.num_queries, 4);
        assert_eq!(metrics.overall.num_correct, 3);
        assert_eq!(metrics.overall.accuracy, Some(0.75));
        assert_eq!(metrics.easy.accuracy, Some(0.5));
        assert_eq!(metrics.hard.accuracy, Some(1.0));
    }

    #[test]
    fn test_empty_bucket_is_null() {
        let metrics = EvalMetrics::from_graded(&[row("easy", true)]);
        assert_eq!(metrics.hard.num_queries, 0);
        assert_eq!(metrics.hard.accuracy, None);

        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["hard"]["accuracy"].is_null());
        assert_eq!(json["easy"]["accuracy"], 1.0);
    }

    #[test]
    fn test_no_rows() {
        let metrics = EvalMetrics::from_graded(&[]);
        assert_eq!(metrics.overall.accuracy, None);
    }
}
