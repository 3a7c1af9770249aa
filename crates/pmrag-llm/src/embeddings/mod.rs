//! Embedding provider implementations

/// OpenAI and Azure OpenAI provider.
pub mod openai;

/// Mock provider for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockEmbeddingProvider;
pub use openai::OpenAIProvider;

use pmrag_config::EmbeddingConfig;
use pmrag_core::{EmbeddingError, EmbeddingProvider, EmbeddingResult};
use std::sync::Arc;
use tracing::info;

use crate::endpoint::ApiEndpoint;

/// Create an embedding provider from configuration
pub fn create_provider(config: &EmbeddingConfig) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
    let credentials = config
        .api
        .credentials()
        .map_err(|e| EmbeddingError::ConfigError(e.to_string()))?;
    let endpoint = ApiEndpoint::new(credentials, config.model.clone());
    let provider = OpenAIProvider::new(endpoint, config.dimensions, config.timeout_secs);
    info!(
        model = provider.model_name(),
        dimensions = provider.dimensions(),
        "embedding provider ready"
    );
    Ok(Arc::new(provider))
}

/// Embed `texts` in chunks of `batch_size`, keeping input order
pub async fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: Vec<String>,
    batch_size: usize,
) -> EmbeddingResult<Vec<Vec<f32>>> {
    let batch_size = batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size) {
        let responses = provider.embed_batch(chunk.to_vec()).await?;
        vectors.extend(responses.into_iter().map(|r| r.embedding));
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmrag_config::ApiProvider;

    #[test]
    fn test_factory_reports_missing_key() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.api.provider, ApiProvider::Azure);
        let err = match create_provider(&config) {
            Ok(_) => panic!("provider created without credentials"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("AZURE_OPENAI_ENDPOINT"));
    }

    #[tokio::test]
    async fn test_embed_in_batches_keeps_order() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_embedding("a", vec![1.0, 0.0])
            .with_embedding("b", vec![0.0, 1.0])
            .with_embedding("c", vec![0.5, 0.5]);
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let vectors = embed_in_batches(&provider, texts, 2).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]]);
        assert_eq!(provider.call_count(), 2);
    }
}
