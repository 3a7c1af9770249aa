//! Error types for the agent

use pmrag_core::{EmbeddingError, LlmError, StoreError};
use thiserror::Error;

/// Errors that end an agent run
///
/// Store failures only surface from [`crate::SimilaritySearch`] called directly; inside
/// [`crate::QueryAgent::run`] they are downgraded to empty results.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Chat model failed
    #[error("Chat model error: {0}")]
    Llm(#[from] LlmError),

    /// Embedding model failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
