//! Deterministic embedding provider for tests

use async_trait::async_trait;
use pmrag_core::{EmbeddingError, EmbeddingProvider, EmbeddingResponse, EmbeddingResult};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock provider: fixed vectors for registered texts, hashed vectors otherwise
pub struct MockEmbeddingProvider {
    dimensions: usize,
    fixed: Mutex<HashMap<String, Vec<f32>>>,
    calls: AtomicUsize,
    failing: bool,
}

impl MockEmbeddingProvider {
    /// Provider producing `dimensions`-long vectors
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            fixed: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            failing: false,
        }
    }

    /// Provider whose every call fails, for error propagation tests
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::with_dimensions(2)
        }
    }

    /// Register the vector returned for `text`
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        match self.fixed.lock() {
            Ok(mut guard) => guard.insert(text.into(), embedding),
            Err(poisoned) => poisoned.into_inner().insert(text.into(), embedding),
        };
        self
    }

    /// Number of `embed` and `embed_batch` calls
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let fixed = match self.fixed.lock() {
            Ok(guard) => guard.get(text).cloned(),
            Err(poisoned) => poisoned.into_inner().get(text).cloned(),
        };
        fixed.unwrap_or_else(|| hashed_vector(text, self.dimensions))
    }
}

fn hashed_vector(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions.max(1)];
    for token in text.split_whitespace() {
        let mut hasher = DefaultHasher::new();
        token.to_lowercase().hash(&mut hasher);
        let slot = (hasher.finish() % vector.len() as u64) as usize;
        vector[slot] += 1.0;
    }
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(EmbeddingError::HttpError("mock embedding failure".to_string()));
        }
        Ok(EmbeddingResponse::new(self.vector_for(text), "mock-embedding"))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> EmbeddingResult<Vec<EmbeddingResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(EmbeddingError::HttpError("mock embedding failure".to_string()));
        }
        Ok(texts
            .iter()
            .map(|t| EmbeddingResponse::new(self.vector_for(t), "mock-embedding"))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }
}
