//! Error types for the Postgres store

use pmrag_core::{EmbeddingError, StoreError};
use thiserror::Error;

/// Postgres store error type
#[derive(Error, Debug)]
pub enum PostgresError {
    /// Could not open the pool
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement failed
    #[error("Query error: {0}")]
    Query(String),

    /// A column could not be turned into a value
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configured schema, table or column name is not a plain identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Bad ingestion input, rejected before anything ran
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding service failed during ingestion
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Underlying sqlx error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Result type for Postgres operations
pub type PostgresResult<T> = Result<T, PostgresError>;

impl From<PostgresError> for StoreError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(msg) => Self::Connection(msg),
            PostgresError::Query(msg) => Self::Query(msg),
            PostgresError::Decode(msg) => Self::Decode(msg),
            PostgresError::InvalidIdentifier(msg) => {
                Self::InvalidOperation(format!("Invalid identifier: {}", msg))
            }
            PostgresError::InvalidInput(msg) => Self::InvalidOperation(msg),
            PostgresError::Embedding(e) => Self::InvalidOperation(e.to_string()),
            PostgresError::Sqlx(e) => match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    Self::Connection(e.to_string())
                }
                sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                    Self::Decode(e.to_string())
                }
                other => Self::Query(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: StoreError = PostgresError::Query("syntax error".to_string()).into();
        assert!(matches!(err, StoreError::Query(ref m) if m == "syntax error"));

        let err: StoreError = PostgresError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, StoreError::Connection(_)));

        let err: StoreError = PostgresError::Sqlx(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, StoreError::Query(_)));
    }
}
