//! Threshold similarity search over a store's embedded records

use pmrag_core::{rank_candidates, EmbeddingProvider, Match, RecordStore};
use std::sync::Arc;
use tracing::debug;

use crate::error::AgentResult;

/// Embeds a text and keeps every stored record scoring above the threshold
#[derive(Clone)]
pub struct SimilaritySearch {
    embedder: Arc<dyn EmbeddingProvider>,
    threshold: f64,
}

impl SimilaritySearch {
    /// Search with `embedder`, keeping scores strictly above `threshold`
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, threshold: f64) -> Self {
        Self { embedder, threshold }
    }

    /// Minimum score a match has to beat
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matches for `text` in `store`, best first
    ///
    /// A store without vectors yields an empty list. Embedding and store failures are
    /// returned to the caller.
    pub async fn search(&self, store: &dyn RecordStore, text: &str) -> AgentResult<Vec<Match>> {
        let query = self.embedder.embed(text).await?;
        let candidates = store.embedded_candidates().await?;
        let total = candidates.len();

        let matches = rank_candidates(&query.embedding, candidates, self.threshold);
        debug!(
            candidates = total,
            matches = matches.len(),
            threshold = self.threshold,
            "similarity search"
        );
        Ok(matches)
    }
}

impl std::fmt::Debug for SimilaritySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilaritySearch")
            .field("model", &self.embedder.model_name())
            .field("threshold", &self.threshold)
            .finish()
    }
}
