//! Question answering seam used by batch evaluation

use async_trait::async_trait;

/// Anything that turns a natural-language question into a natural-language answer
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    /// Failure type of a single answer
    type Error: std::error::Error + Send + Sync + 'static;

    /// Answer one question
    async fn answer(&self, question: &str) -> Result<String, Self::Error>;
}
