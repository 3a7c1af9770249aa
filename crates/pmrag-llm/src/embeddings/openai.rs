//! OpenAI / Azure OpenAI embeddings

use async_trait::async_trait;
use pmrag_core::{EmbeddingError, EmbeddingProvider, EmbeddingResponse, EmbeddingResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::endpoint::ApiEndpoint;

/// Embeddings over the OpenAI wire format
pub struct OpenAIProvider {
    client: reqwest::Client,
    endpoint: ApiEndpoint,
    dimensions: usize,
    timeout: Duration,
}

impl OpenAIProvider {
    /// Create a provider producing vectors of `dimensions` length
    pub fn new(endpoint: ApiEndpoint, dimensions: usize, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            dimensions,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn request(&self, input: Vec<String>) -> EmbeddingResult<Vec<EmbeddingResponse>> {
        let expected = input.len();
        let mut body = serde_json::json!({ "input": input });
        if self.endpoint.sends_model() {
            body["model"] = serde_json::json!(self.endpoint.model());
        }

        let response = self
            .endpoint
            .authorize(self.client.post(self.endpoint.url("embeddings")))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| EmbeddingError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::InvalidResponse(format!(
                "embeddings API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            EmbeddingError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        if parsed.data.len() != expected {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                expected,
                parsed.data.len()
            )));
        }

        let model = parsed
            .model
            .unwrap_or_else(|| self.endpoint.model().to_string());
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimensions {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    });
                }
                Ok(EmbeddingResponse::new(d.embedding, model.clone()))
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<EmbeddingResponse> {
        debug!(chars = text.len(), "embedding query text");
        self.request(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embeddings response".to_string()))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> EmbeddingResult<Vec<EmbeddingResponse>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = texts.len(), "embedding batch");
        self.request(texts).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        self.endpoint.model()
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
