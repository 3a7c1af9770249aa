use anyhow::{Context, Result};
use pmrag_config::Config;
use pmrag_eval::{read_answer_key, read_queries, score_graded, EvalPaths, Evaluator};
use std::path::PathBuf;

use crate::cli::StoreKind;
use crate::{factories, output};

pub struct EvalArgs {
    pub store: StoreKind,
    pub queries: Option<PathBuf>,
    pub answers: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub graded: Option<PathBuf>,
}

pub async fn execute(config: &Config, args: EvalArgs) -> Result<()> {
    let out_dir = args.out_dir.unwrap_or_else(|| config.eval.output_dir.clone());
    let paths = EvalPaths::new(&out_dir, args.store.dialect());

    if let Some(graded) = args.graded {
        let metrics = score_graded(&graded, &paths.results)
            .with_context(|| format!("failed to score {}", graded.display()))?;
        println!("{}", output::metrics_table(&metrics));
        println!("Results written to {}", paths.results.display());
        return Ok(());
    }

    let queries = args.queries.unwrap_or_else(|| config.eval.queries_path.clone());
    let answers = args.answers.unwrap_or_else(|| config.eval.answers_path.clone());
    let cases = read_queries(&queries)?;
    let key = read_answer_key(&answers)?;

    let agent = factories::query_agent(config, args.store).await?;
    let report = Evaluator::new(agent).run(&cases, &key, &paths).await?;

    println!("{}", output::metrics_table(&report.metrics));
    if report.failed > 0 {
        println!("{} queries failed and were graded incorrect", report.failed);
    }
    println!("Responses: {}", paths.responses.display());
    println!("Graded:    {}", paths.graded.display());
    println!("Results:   {}", paths.results.display());
    Ok(())
}
