//! Error types for the Neo4j store

use pmrag_core::{EmbeddingError, StoreError};
use thiserror::Error;

/// Neo4j store error type
#[derive(Error, Debug)]
pub enum Neo4jError {
    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Neo4j rejected the statement
    #[error("Cypher error {code}: {message}")]
    Cypher {
        /// Neo4j status code, e.g. `Neo.ClientError.Statement.SyntaxError`
        code: String,
        /// Server message
        message: String,
    },

    /// Body did not have the transactional endpoint's shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configured label or property name is not a plain identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Missing connection settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding service failed during ingestion
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Result type for Neo4j operations
pub type Neo4jResult<T> = Result<T, Neo4jError>;

impl From<reqwest::Error> for Neo4jError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<Neo4jError> for StoreError {
    fn from(err: Neo4jError) -> Self {
        match err {
            Neo4jError::Http(msg) => Self::Connection(msg),
            Neo4jError::Config(msg) => Self::Connection(msg),
            Neo4jError::Cypher { code, message } => Self::Query(format!("{}: {}", code, message)),
            Neo4jError::InvalidResponse(msg) => Self::Decode(msg),
            Neo4jError::InvalidIdentifier(msg) => {
                Self::InvalidOperation(format!("Invalid identifier: {}", msg))
            }
            Neo4jError::Embedding(e) => Self::InvalidOperation(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cypher_error_becomes_query_error() {
        let err: StoreError = Neo4jError::Cypher {
            code: "Neo.ClientError.Statement.SyntaxError".into(),
            message: "Invalid input".into(),
        }
        .into();
        assert!(matches!(err, StoreError::Query(ref m) if m.contains("SyntaxError")));
    }
}
