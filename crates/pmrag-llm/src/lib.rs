//! Chat and embedding providers for pmrag
//!
//! Both OpenAI and Azure OpenAI are reached over plain HTTP with `reqwest`; see
//! [`ApiEndpoint`] for the url and header differences.

#![warn(missing_docs)]

/// Chat completion providers
pub mod chat;

/// Embedding providers
pub mod embeddings;

mod endpoint;

pub use chat::{create_chat_provider, OpenAIChatProvider};
pub use embeddings::{create_provider, embed_in_batches, OpenAIProvider};
pub use endpoint::ApiEndpoint;

#[cfg(any(test, feature = "test-utils"))]
pub use chat::MockChatProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use embeddings::MockEmbeddingProvider;
