//! Running the sample queries through an answerer

use pmrag_core::{QueryDialect, QuestionAnswerer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::dataset::{self, GradedRow, QueryCase, ResponseRow};
use crate::error::EvalResult;
use crate::grading;
use crate::metrics::EvalMetrics;

/// Output directory name per store
pub fn output_subdir(dialect: QueryDialect) -> &'static str {
    match dialect {
        QueryDialect::Sql => "sql-rag",
        QueryDialect::Cypher => "kg-rag",
    }
}

/// Files written by one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPaths {
    /// `id;response`
    pub responses: PathBuf,
    /// `id;difficulty;response;correct`
    pub graded: PathBuf,
    /// Metrics JSON
    pub results: PathBuf,
}

impl EvalPaths {
    /// Paths under `output_dir/<store subdir>`
    pub fn new(output_dir: &Path, dialect: QueryDialect) -> Self {
        let dir = output_dir.join(output_subdir(dialect));
        Self {
            responses: dir.join("responses.csv"),
            graded: dir.join("graded.csv"),
            results: dir.join("results.json"),
        }
    }
}

/// Outcome of an evaluation
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Aggregated accuracy
    pub metrics: EvalMetrics,
    /// Per-query verdicts
    pub graded: Vec<GradedRow>,
    /// Queries whose answerer call failed
    pub failed: usize,
}

/// Runs queries one after another through an answerer
pub struct Evaluator<A> {
    answerer: A,
}

impl<A: QuestionAnswerer> Evaluator<A> {
    /// Evaluate `answerer`
    pub fn new(answerer: A) -> Self {
        Self { answerer }
    }

    /// The answerer under evaluation
    pub fn answerer(&self) -> &A {
        &self.answerer
    }

    /// Answer every case in order; failed cases are logged and left out
    pub async fn respond(&self, cases: &[QueryCase]) -> Vec<ResponseRow> {
        let mut responses = Vec::with_capacity(cases.len());
        for (i, case) in cases.iter().enumerate() {
            info!(id = %case.id, progress = i + 1, total = cases.len(), "evaluating query");
            match self.answerer.answer(&case.query).await {
                Ok(response) => responses.push(ResponseRow {
                    id: case.id.clone(),
                    response,
                }),
                Err(e) => warn!(id = %case.id, error = %e, "query failed, no response recorded"),
            }
        }
        responses
    }

    /// Answer, grade against `answer_key` and write every output file
    pub async fn run(
        &self,
        cases: &[QueryCase],
        answer_key: &BTreeMap<String, String>,
        paths: &EvalPaths,
    ) -> EvalResult<EvalReport> {
        let responses = self.respond(cases).await;
        let failed = cases.len() - responses.len();
        dataset::write_responses(&paths.responses, &responses)?;

        let by_id: BTreeMap<String, String> = responses
            .into_iter()
            .map(|row| (row.id, row.response))
            .collect();
        let graded = grading::grade(cases, &by_id, answer_key);
        dataset::write_graded(&paths.graded, &graded)?;

        let metrics = EvalMetrics::from_graded(&graded);
        metrics.write_json(&paths.results)?;
        info!(
            queries = cases.len(),
            failed,
            correct = metrics.overall.num_correct,
            results = %paths.results.display(),
            "evaluation finished"
        );

        Ok(EvalReport {
            metrics,
            graded,
            failed,
        })
    }
}

/// Score an already graded file and write the metrics next to `results`
pub fn score_graded(graded: &Path, results: &Path) -> EvalResult<EvalMetrics> {
    let rows = dataset::read_graded(graded)?;
    let metrics = EvalMetrics::from_graded(&rows);
    metrics.write_json(results)?;
    Ok(metrics)
}
