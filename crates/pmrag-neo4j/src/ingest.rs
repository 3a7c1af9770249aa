//! Building the graph from relational records and backfilling node embeddings

use pmrag_core::{EmbeddingProvider, NodeLabel, Record, Value};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::client::Neo4jClient;
use crate::error::Neo4jResult;
use crate::schema::validate_identifier;

/// Property holding the source record's object class
pub const OBJECT_CLASS_PROPERTY: &str = "pxobjclass";

const WRITE_CHUNK: usize = 500;

/// Ownership relationships derived from foreign-key-like properties
const RELATIONSHIPS: [(&str, &str, &str, &str); 3] = [
    ("UserStory", "epicid", "Epic", "IS_STORY_OF_EPIC"),
    ("Epic", "goalid", "Goal", "IS_EPIC_OF_GOAL"),
    ("Goal", "projectid", "Project", "IS_GOAL_OF_PROJECT"),
];

/// Outcome of a graph build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphLoadReport {
    /// Nodes created per label
    pub nodes: BTreeMap<String, usize>,
    /// Records skipped because their object class maps to no label
    pub skipped: usize,
    /// Relationships merged per type
    pub relationships: BTreeMap<String, usize>,
}

/// Outcome of a node embedding backfill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeEmbeddingReport {
    /// Nodes embedded per label
    pub embedded: BTreeMap<String, usize>,
}

/// Writes nodes, relationships and embeddings
pub struct GraphIngestor<'a> {
    client: &'a Neo4jClient,
    embedding_property: String,
}

impl<'a> GraphIngestor<'a> {
    /// Ingestor writing embeddings to `embedding_property`
    pub fn new(client: &'a Neo4jClient, embedding_property: &str) -> Neo4jResult<Self> {
        Ok(Self {
            client,
            embedding_property: validate_identifier(embedding_property)?.to_string(),
        })
    }

    /// Create one node per record, labelled from its object class, then link them.
    ///
    /// With `reset` the whole graph is deleted first.
    pub async fn load_records(&self, records: &[Record], reset: bool) -> Neo4jResult<GraphLoadReport> {
        if reset {
            info!("Clearing graph");
            self.client.query("MATCH (n) DETACH DELETE n").await?;
        }

        let mut report = GraphLoadReport::default();
        let mut by_label: BTreeMap<NodeLabel, Vec<serde_json::Value>> = BTreeMap::new();
        for record in records {
            let class = record
                .get(OBJECT_CLASS_PROPERTY)
                .and_then(Value::as_str)
                .unwrap_or_default();
            match NodeLabel::from_object_class(class) {
                Some(label) => by_label.entry(label).or_default().push(node_properties(record)),
                None => {
                    warn!(object_class = class, "no node label for object class, skipping record");
                    report.skipped += 1;
                }
            }
        }

        for (label, rows) in by_label {
            let mut created = 0;
            for chunk in rows.chunks(WRITE_CHUNK) {
                let cypher = format!(
                    "UNWIND $rows AS props CREATE (n:{}) SET n += props RETURN count(n) AS created",
                    label.as_str()
                );
                let result = self
                    .client
                    .query_with_params(&cypher, params("rows", chunk.to_vec()))
                    .await?;
                created += count_from(&result, "created");
            }
            debug!(label = label.as_str(), created, "nodes created");
            report.nodes.insert(label.as_str().to_string(), created);
        }

        for (start, key, end, rel_type) in RELATIONSHIPS {
            let cypher = format!(
                "MATCH (a:{start}), (b:{end}) WHERE a.{key} = b.pyid \
                 MERGE (a)-[r:{rel_type}]->(b) RETURN count(r) AS linked"
            );
            let result = self.client.query(&cypher).await?;
            report
                .relationships
                .insert(rel_type.to_string(), count_from(&result, "linked"));
        }

        info!(
            labels = report.nodes.len(),
            skipped = report.skipped,
            "graph built"
        );
        Ok(report)
    }

    /// Embed `text_properties` of every node that has no embedding yet
    pub async fn embed_nodes(
        &self,
        embedder: &dyn EmbeddingProvider,
        text_properties: &[String],
        batch_size: usize,
    ) -> Neo4jResult<NodeEmbeddingReport> {
        let properties = text_properties
            .iter()
            .map(|p| validate_identifier(p).map(str::to_string))
            .collect::<Neo4jResult<Vec<_>>>()?;
        let returns: Vec<String> = properties
            .iter()
            .map(|p| format!("n.{p} AS {p}"))
            .collect();

        let mut report = NodeEmbeddingReport::default();
        for label in NodeLabel::ALL {
            let cypher = format!(
                "MATCH (n:{label}) WHERE n.{emb} IS NULL AND n.pyid IS NOT NULL \
                 RETURN n.pyid AS pyid{sep}{returns}",
                label = label.as_str(),
                emb = self.embedding_property,
                sep = if returns.is_empty() { "" } else { ", " },
                returns = returns.join(", "),
            );
            let records = self.client.query(&cypher).await?;
            if records.is_empty() {
                continue;
            }

            let ids: Vec<serde_json::Value> = records
                .iter()
                .map(|r| r.get("pyid").map(Value::to_json).unwrap_or_default())
                .collect();
            let texts: Vec<String> = records
                .iter()
                .map(|r| node_text(r, &properties))
                .collect();

            let vectors = pmrag_llm::embed_in_batches(embedder, texts, batch_size).await?;
            let rows: Vec<serde_json::Value> = ids
                .into_iter()
                .zip(vectors)
                .map(|(pyid, embedding)| json!({ "pyid": pyid, "embedding": embedding }))
                .collect();

            let write = format!(
                "UNWIND $rows AS row MATCH (n:{label} {{pyid: row.pyid}}) \
                 SET n.{emb} = row.embedding RETURN count(n) AS updated",
                label = label.as_str(),
                emb = self.embedding_property,
            );
            let mut updated = 0;
            for chunk in rows.chunks(WRITE_CHUNK) {
                let result = self
                    .client
                    .query_with_params(&write, params("rows", chunk.to_vec()))
                    .await?;
                updated += count_from(&result, "updated");
            }
            info!(label = label.as_str(), updated, "node embeddings written");
            report.embedded.insert(label.as_str().to_string(), updated);
        }
        Ok(report)
    }
}

/// Node properties for a record: nulls, vectors and nested maps are dropped
pub fn node_properties(record: &Record) -> serde_json::Value {
    let props: serde_json::Map<String, serde_json::Value> = record
        .iter()
        .filter(|(_, v)| !matches!(v, Value::Null | Value::Vector(_) | Value::Map(_)))
        .map(|(k, v)| (k.to_string(), v.to_json()))
        .collect();
    serde_json::Value::Object(props)
}

fn node_text(record: &Record, properties: &[String]) -> String {
    properties
        .iter()
        .filter_map(|p| record.get(p).and_then(Value::to_plain_string))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn params(name: &str, rows: Vec<serde_json::Value>) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    map.insert(name.to_string(), serde_json::Value::Array(rows));
    map
}

fn count_from(records: &[Record], column: &str) -> usize {
    records
        .first()
        .and_then(|r| r.get(column))
        .and_then(Value::as_f64)
        .map(|n| n.max(0.0) as usize)
        .unwrap_or(0)
}
