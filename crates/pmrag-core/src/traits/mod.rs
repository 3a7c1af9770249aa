//! Abstraction traits
//!
//! - [`RecordStore`]: a queryable store (Postgres table, Neo4j graph)
//! - [`ChatProvider`]: text-in/text-out chat completion
//! - [`EmbeddingProvider`]: text-in/vector-out embedding
//! - [`QuestionAnswerer`]: anything that answers a natural-language question

pub mod answer;
pub mod embedding;
pub mod llm;
pub mod store;

pub use answer::QuestionAnswerer;
pub use embedding::{EmbeddingError, EmbeddingProvider, EmbeddingResponse, EmbeddingResult};
pub use llm::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, LlmError, LlmResult, MessageRole,
};
pub use store::{QueryDialect, RecordStore, StoreError, StoreResult};
