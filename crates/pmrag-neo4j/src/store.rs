//! `RecordStore` over a Neo4j graph

use async_trait::async_trait;
use pmrag_config::Neo4jConfig;
use pmrag_core::{Candidate, QueryDialect, Record, RecordStore, StoreResult, Value};
use tracing::{debug, info};

use crate::client::Neo4jClient;
use crate::error::{Neo4jError, Neo4jResult};
use crate::schema::{validate_identifier, GraphSchema};

/// Neo4j-backed store
#[derive(Debug, Clone)]
pub struct Neo4jStore {
    client: Neo4jClient,
    embedding_property: String,
}

impl Neo4jStore {
    /// Wrap a client; `embedding_property` must be a plain identifier
    pub fn new(client: Neo4jClient, embedding_property: &str) -> Neo4jResult<Self> {
        Ok(Self {
            client,
            embedding_property: validate_identifier(embedding_property)?.to_string(),
        })
    }

    /// Resolve connection settings and build the store
    pub fn connect(config: &Neo4jConfig) -> Neo4jResult<Self> {
        let connection = config
            .connection()
            .map_err(|e| Neo4jError::Config(e.to_string()))?;
        info!(url = %connection.url, database = %connection.database, "Neo4j store ready");
        Self::new(Neo4jClient::new(&connection), &config.embedding_property)
    }

    /// Underlying client
    pub fn client(&self) -> &Neo4jClient {
        &self.client
    }

    /// Node property holding embeddings
    pub fn embedding_property(&self) -> &str {
        &self.embedding_property
    }

    /// Schema text for the model
    pub async fn describe(&self) -> Neo4jResult<String> {
        Ok(GraphSchema::fetch(&self.client, &self.embedding_property)
            .await?
            .render())
    }

    /// Nodes with an embedding, as ranking candidates
    pub async fn candidates(&self) -> Neo4jResult<Vec<Candidate>> {
        let cypher = format!(
            "MATCH (n) WHERE n.{emb} IS NOT NULL AND n.pyid IS NOT NULL \
             RETURN n.pyid AS pyid, n.pylabel AS pylabel, n.{emb} AS embedding",
            emb = self.embedding_property
        );
        let records = self.client.query(&cypher).await?;
        let candidates: Vec<Candidate> = records.iter().filter_map(candidate_from_record).collect();
        debug!(candidates = candidates.len(), "loaded embedded nodes");
        Ok(candidates)
    }
}

fn candidate_from_record(record: &Record) -> Option<Candidate> {
    let id = record.get("pyid")?.to_plain_string()?;
    let label = record.get("pylabel").and_then(Value::to_plain_string);
    let embedding = record.get("embedding")?.as_embedding()?;
    Some(Candidate::new(id, label, embedding))
}

#[async_trait]
impl RecordStore for Neo4jStore {
    fn dialect(&self) -> QueryDialect {
        QueryDialect::Cypher
    }

    fn embedding_field(&self) -> &str {
        &self.embedding_property
    }

    async fn schema(&self) -> StoreResult<String> {
        Ok(self.describe().await?)
    }

    async fn execute(&self, query: &str) -> StoreResult<Vec<Record>> {
        Ok(self.client.query(query).await?)
    }

    async fn embedded_candidates(&self) -> StoreResult<Vec<Candidate>> {
        Ok(self.candidates().await?)
    }
}
