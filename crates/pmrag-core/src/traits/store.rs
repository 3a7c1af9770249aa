//! Store abstraction shared by the Postgres and Neo4j adapters
//!
//! Adapters are thin pass-throughs: one call, one statement, no retries. Whether a
//! failure is fatal is the caller's decision.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::record::{Candidate, Record};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Could not reach the store
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed the statement
    #[error("Query error: {0}")]
    Query(String),

    /// A row or record could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid input before anything was sent
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Query language spoken by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryDialect {
    /// PostgreSQL
    Sql,
    /// Neo4j Cypher
    Cypher,
}

impl QueryDialect {
    /// Short name
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryDialect::Sql => "sql",
            QueryDialect::Cypher => "cypher",
        }
    }
}

impl fmt::Display for QueryDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store the agent can query
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Language `execute` accepts
    fn dialect(&self) -> QueryDialect;

    /// Column or node property holding the stored embedding
    fn embedding_field(&self) -> &str;

    /// Schema description given to the model when it writes queries
    async fn schema(&self) -> StoreResult<String>;

    /// Run one statement and return its rows
    async fn execute(&self, query: &str) -> StoreResult<Vec<Record>>;

    /// Every record that has a stored embedding
    async fn embedded_candidates(&self) -> StoreResult<Vec<Candidate>>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn dialect(&self) -> QueryDialect {
        (**self).dialect()
    }

    fn embedding_field(&self) -> &str {
        (**self).embedding_field()
    }

    async fn schema(&self) -> StoreResult<String> {
        (**self).schema().await
    }

    async fn execute(&self, query: &str) -> StoreResult<Vec<Record>> {
        (**self).execute(query).await
    }

    async fn embedded_candidates(&self) -> StoreResult<Vec<Candidate>> {
        (**self).embedded_candidates().await
    }
}
