//! Batch evaluation for pmrag
//!
//! Reads `;`-separated sample queries, answers them sequentially, grades the answers
//! against a key and writes responses, verdicts and accuracy metrics:
//!
//! ```text
//! <output_dir>/sql-rag/responses.csv   id;response
//! <output_dir>/sql-rag/graded.csv      id;difficulty;response;correct
//! <output_dir>/sql-rag/results.json    overall / easy / hard accuracy
//! ```
//!
//! The graph store writes to `kg-rag/` instead.

pub mod dataset;
pub mod error;
pub mod grading;
pub mod metrics;
pub mod runner;

pub use dataset::{read_answer_key, read_queries, GradedRow, QueryCase, ResponseRow};
pub use error::{EvalError, EvalResult};
pub use metrics::{BucketMetrics, EvalMetrics};
pub use runner::{output_subdir, score_graded, EvalPaths, EvalReport, Evaluator};
