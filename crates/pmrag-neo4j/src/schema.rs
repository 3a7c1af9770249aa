//! Graph schema text given to the model

use once_cell::sync::Lazy;
use pmrag_core::Record;
use regex::Regex;
use std::collections::BTreeMap;

use crate::client::Neo4jClient;
use crate::error::{Neo4jError, Neo4jResult};

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Accept only plain label or property names; these get interpolated into Cypher
pub fn validate_identifier(name: &str) -> Neo4jResult<&str> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(name)
    } else {
        Err(Neo4jError::InvalidIdentifier(name.to_string()))
    }
}

const NODE_PROPERTIES: &str = "MATCH (n) UNWIND labels(n) AS label UNWIND keys(n) AS key \
     RETURN DISTINCT label, key ORDER BY label, key";
const RELATIONSHIP_PROPERTIES: &str = "MATCH ()-[r]->() UNWIND keys(r) AS key \
     RETURN DISTINCT type(r) AS type, key ORDER BY type, key";
const RELATIONSHIP_PATTERNS: &str = "MATCH (a)-[r]->(b) \
     RETURN DISTINCT labels(a)[0] AS start, type(r) AS type, labels(b)[0] AS end \
     ORDER BY start, type, end";

/// Labels, properties and relationship patterns present in the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSchema {
    /// Node label to property keys
    pub node_properties: BTreeMap<String, Vec<String>>,
    /// Relationship type to property keys
    pub relationship_properties: BTreeMap<String, Vec<String>>,
    /// `(start label, relationship type, end label)` triples
    pub relationships: Vec<(String, String, String)>,
}

impl GraphSchema {
    /// Read the schema, leaving out `hidden_property` (the embedding)
    pub async fn fetch(client: &Neo4jClient, hidden_property: &str) -> Neo4jResult<Self> {
        let node_rows = client.query(NODE_PROPERTIES).await?;
        let rel_rows = client.query(RELATIONSHIP_PROPERTIES).await?;
        let pattern_rows = client.query(RELATIONSHIP_PATTERNS).await?;

        Ok(Self {
            node_properties: group_keys(&node_rows, "label", hidden_property),
            relationship_properties: group_keys(&rel_rows, "type", hidden_property),
            relationships: pattern_rows
                .iter()
                .filter_map(|r| {
                    Some((
                        r.get("start")?.as_str()?.to_string(),
                        r.get("type")?.as_str()?.to_string(),
                        r.get("end")?.as_str()?.to_string(),
                    ))
                })
                .collect(),
        })
    }

    /// Render as text for the Cypher prompt
    pub fn render(&self) -> String {
        let mut out = String::from("Node properties are the following:\n");
        for (label, keys) in &self.node_properties {
            out.push_str(&format!("{} {{{}}}\n", label, keys.join(", ")));
        }
        out.push_str("Relationship properties are the following:\n");
        for (rel_type, keys) in &self.relationship_properties {
            out.push_str(&format!("{} {{{}}}\n", rel_type, keys.join(", ")));
        }
        out.push_str("The relationships are the following:\n");
        for (start, rel_type, end) in &self.relationships {
            out.push_str(&format!("(:{})-[:{}]->(:{})\n", start, rel_type, end));
        }
        out.trim_end().to_string()
    }
}

fn group_keys(rows: &[Record], group_column: &str, hidden: &str) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows {
        let (Some(group), Some(key)) = (
            row.get(group_column).and_then(|v| v.as_str()),
            row.get("key").and_then(|v| v.as_str()),
        ) else {
            continue;
        };
        if key == hidden {
            continue;
        }
        let keys = grouped.entry(group.to_string()).or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    grouped
}
