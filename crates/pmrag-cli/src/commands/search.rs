use anyhow::Result;
use pmrag_agent::SimilaritySearch;
use pmrag_config::Config;
use tracing::info;

use crate::cli::StoreKind;
use crate::{factories, output};

pub async fn execute(
    config: &Config,
    store: StoreKind,
    text: String,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let threshold = threshold.unwrap_or(match store {
        StoreKind::Sql => config.agent.sql_threshold,
        StoreKind::Graph => config.agent.graph_threshold,
    });
    let embedder = factories::embedding_provider(config)?;
    let records = factories::record_store(config, store).await?;

    let search = SimilaritySearch::new(embedder, threshold);
    let matches = search.search(records.as_ref(), &text).await?;
    info!(matches = matches.len(), threshold, "search finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("No records scored above {threshold}.");
    } else {
        println!("{}", output::matches_table(&matches));
    }
    Ok(())
}
