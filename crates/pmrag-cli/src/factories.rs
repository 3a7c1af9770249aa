//! Composition root: concrete adapters assembled from the config
//!
//! Each function resolves only the config sections it needs, so `ask --store sql` never
//! asks for Neo4j credentials.

use anyhow::{Context, Result};
use pmrag_agent::QueryAgent;
use pmrag_config::Config;
use pmrag_core::{ChatProvider, EmbeddingProvider, RecordStore};
use pmrag_neo4j::Neo4jStore;
use pmrag_postgres::PostgresStore;
use std::sync::Arc;

use crate::cli::StoreKind;

pub fn chat_provider(config: &Config) -> Result<Arc<dyn ChatProvider>> {
    pmrag_llm::create_chat_provider(&config.llm).context("failed to set up the chat model")
}

pub fn embedding_provider(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    pmrag_llm::create_provider(&config.embedding).context("failed to set up the embedding model")
}

pub async fn postgres_store(config: &Config) -> Result<PostgresStore> {
    PostgresStore::connect(&config.postgres)
        .await
        .context("failed to connect to Postgres")
}

pub fn neo4j_store(config: &Config) -> Result<Neo4jStore> {
    Neo4jStore::connect(&config.neo4j).context("failed to set up the Neo4j client")
}

pub async fn record_store(config: &Config, kind: StoreKind) -> Result<Arc<dyn RecordStore>> {
    Ok(match kind {
        StoreKind::Sql => Arc::new(postgres_store(config).await?),
        StoreKind::Graph => Arc::new(neo4j_store(config)?),
    })
}

pub async fn query_agent(config: &Config, kind: StoreKind) -> Result<QueryAgent> {
    let chat = chat_provider(config)?;
    let embedder = embedding_provider(config)?;
    let store = record_store(config, kind).await?;
    Ok(QueryAgent::new(chat, embedder, store, &config.agent))
}
