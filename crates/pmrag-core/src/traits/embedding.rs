//! Embedding model abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Embedding errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmbeddingError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The endpoint answered with something we could not use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider misconfiguration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Vector length did not match what the provider promised
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimensions
        expected: usize,
        /// Returned dimensions
        actual: usize,
    },
}

/// One embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vector
    pub embedding: Vec<f32>,
    /// Model that produced it
    pub model: String,
    /// Vector length
    pub dimensions: usize,
}

impl EmbeddingResponse {
    /// Create a response, deriving `dimensions` from the vector
    pub fn new(embedding: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = embedding.len();
        Self {
            embedding,
            model: model.into(),
            dimensions,
        }
    }
}

/// Text embedding provider
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text
    async fn embed(&self, text: &str) -> EmbeddingResult<EmbeddingResponse>;

    /// Embed many texts; output order matches input order
    async fn embed_batch(&self, texts: Vec<String>) -> EmbeddingResult<Vec<EmbeddingResponse>>;

    /// Expected vector length
    fn dimensions(&self) -> usize;

    /// Model name
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    async fn embed(&self, text: &str) -> EmbeddingResult<EmbeddingResponse> {
        (**self).embed(text).await
    }

    async fn embed_batch(&self, texts: Vec<String>) -> EmbeddingResult<Vec<EmbeddingResponse>> {
        (**self).embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
