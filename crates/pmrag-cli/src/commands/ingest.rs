use anyhow::{Context, Result};
use pmrag_config::Config;
use pmrag_neo4j::GraphIngestor;
use std::path::Path;

use crate::cli::IngestCommands;
use crate::factories;

pub async fn execute(config: &Config, command: IngestCommands) -> Result<()> {
    match command {
        IngestCommands::FilterTable {
            source,
            columns,
            overwrite,
        } => filter_table(config, &source, &columns, overwrite).await,
        IngestCommands::EmbedSql => embed_sql(config).await,
        IngestCommands::BuildGraph { no_reset } => build_graph(config, !no_reset).await,
        IngestCommands::EmbedGraph => embed_graph(config).await,
    }
}

async fn filter_table(config: &Config, source: &str, columns: &Path, overwrite: bool) -> Result<()> {
    let text = std::fs::read_to_string(columns)
        .with_context(|| format!("failed to read {}", columns.display()))?;
    let columns = pmrag_postgres::parse_required_columns(&text)
        .with_context(|| format!("invalid column list in {}", columns.display()))?;

    let store = factories::postgres_store(config).await?;
    let report = pmrag_postgres::filter_table(&store, source, &columns, overwrite)
        .await
        .context("failed to create the filtered table")?;
    println!(
        "Created {} with {} columns and {} rows from {}",
        report.table, report.columns, report.rows, report.source
    );

    let created = pmrag_postgres::filtered_table_name(source);
    if created != store.layout().table {
        println!(
            "Note: the configured table is {}; set postgres.table = \"{}\" to query the new table.",
            store.layout().table,
            created
        );
    }
    Ok(())
}

async fn embed_sql(config: &Config) -> Result<()> {
    let store = factories::postgres_store(config).await?;
    let embedder = factories::embedding_provider(config)?;
    let report = pmrag_postgres::embed_table(&store, embedder.as_ref(), config.embedding.batch_size)
        .await
        .context("failed to embed the Postgres table")?;
    println!(
        "Embedded {} rows into {} ({} failed)",
        report.embedded,
        store.layout().qualified_table(),
        report.failed
    );
    Ok(())
}

async fn build_graph(config: &Config, reset: bool) -> Result<()> {
    let source = factories::postgres_store(config).await?;
    let records = source
        .table_records()
        .await
        .context("failed to read the Postgres table")?;
    let graph = factories::neo4j_store(config)?;

    let ingestor = GraphIngestor::new(graph.client(), graph.embedding_property())?;
    let report = ingestor
        .load_records(&records, reset)
        .await
        .context("failed to build the graph")?;

    for (label, count) in &report.nodes {
        println!("{label}: {count} nodes");
    }
    for (rel_type, count) in &report.relationships {
        println!("{rel_type}: {count} relationships");
    }
    if report.skipped > 0 {
        println!("{} records skipped (unknown object class)", report.skipped);
    }
    Ok(())
}

async fn embed_graph(config: &Config) -> Result<()> {
    let graph = factories::neo4j_store(config)?;
    let embedder = factories::embedding_provider(config)?;
    let ingestor = GraphIngestor::new(graph.client(), graph.embedding_property())?;
    let report = ingestor
        .embed_nodes(
            embedder.as_ref(),
            &config.neo4j.text_properties,
            config.embedding.batch_size,
        )
        .await
        .context("failed to embed graph nodes")?;

    if report.embedded.is_empty() {
        println!("Every node already has an embedding.");
    }
    for (label, count) in &report.embedded {
        println!("{label}: {count} nodes embedded");
    }
    Ok(())
}
