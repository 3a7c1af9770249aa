//! Minimal client for the Neo4j HTTP transactional endpoint
//!
//! Every call is one auto-committed transaction:
//! `POST {url}/db/{database}/tx/commit` with basic auth.

use pmrag_config::Neo4jConnection;
use pmrag_core::{Record, Value};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{Neo4jError, Neo4jResult};

/// Neo4j HTTP client
#[derive(Clone)]
pub struct Neo4jClient {
    http: reqwest::Client,
    commit_url: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl std::fmt::Debug for Neo4jClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jClient")
            .field("commit_url", &self.commit_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Neo4jClient {
    /// Client for `connection`
    pub fn new(connection: &Neo4jConnection) -> Self {
        Self {
            http: reqwest::Client::new(),
            commit_url: format!(
                "{}/db/{}/tx/commit",
                connection.url.trim_end_matches('/'),
                connection.database
            ),
            username: connection.username.clone(),
            password: connection.password.clone(),
            timeout: Duration::from_secs(connection.timeout_secs),
        }
    }

    /// Run a statement without parameters
    pub async fn query(&self, cypher: &str) -> Neo4jResult<Vec<Record>> {
        self.query_with_params(cypher, serde_json::Map::new()).await
    }

    /// Run a statement with a parameter map
    pub async fn query_with_params(
        &self,
        cypher: &str,
        params: serde_json::Map<String, serde_json::Value>,
    ) -> Neo4jResult<Vec<Record>> {
        let body = CommitRequest {
            statements: vec![Statement {
                statement: cypher,
                parameters: params,
                result_data_contents: ["row"],
            }],
        };

        debug!(cypher, "executing Cypher");
        let response = self
            .http
            .post(&self.commit_url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json;charset=UTF-8")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Neo4jError::Http(format!(
                "Neo4j returned {}: {}",
                status, error_text
            )));
        }

        let parsed: CommitResponse = response
            .json()
            .await
            .map_err(|e| Neo4jError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let records = parsed.into_records()?;
        debug!(records = records.len(), "Cypher returned");
        Ok(records)
    }
}

#[derive(Debug, Serialize)]
struct CommitRequest<'a> {
    statements: Vec<Statement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Statement<'a> {
    statement: &'a str,
    parameters: serde_json::Map<String, serde_json::Value>,
    result_data_contents: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    code: String,
    message: String,
}

impl CommitResponse {
    fn into_records(self) -> Neo4jResult<Vec<Record>> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(Neo4jError::Cypher {
                code: error.code,
                message: error.message,
            });
        }

        let Some(result) = self.results.into_iter().next() else {
            return Ok(Vec::new());
        };

        let columns = result.columns;
        result
            .data
            .into_iter()
            .map(|data| {
                if data.row.len() != columns.len() {
                    return Err(Neo4jError::InvalidResponse(format!(
                        "row has {} values for {} columns",
                        data.row.len(),
                        columns.len()
                    )));
                }
                Ok(columns
                    .iter()
                    .cloned()
                    .zip(data.row.into_iter().map(Value::from_json))
                    .collect())
            })
            .collect()
    }
}
