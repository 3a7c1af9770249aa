//! # pmrag core
//!
//! Backend-agnostic building blocks shared by every pmrag crate.
//!
//! ## Modules
//!
//! - [`record`]: `Record`, `Value`, `Candidate` and `Match` - the data that flows between
//!   stores, the similarity search and the agent
//! - [`label`]: the closed set of node labels used by the graph store
//! - [`similarity`]: cosine similarity and threshold ranking
//! - [`traits`]: seams for stores, chat models, embedding models and answerers
//!
//! ## Design Principles
//!
//! **Dependency Inversion**: core defines the interfaces, adapters live in
//! `pmrag-postgres`, `pmrag-neo4j` and `pmrag-llm`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod label;
pub mod record;
pub mod similarity;
pub mod traits;

pub use label::NodeLabel;
pub use record::{Candidate, Match, Record, Value};
pub use similarity::{cosine_similarity, rank_candidates};
pub use traits::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, EmbeddingError, EmbeddingProvider,
    EmbeddingResponse, EmbeddingResult, LlmError, LlmResult, MessageRole, QueryDialect,
    QuestionAnswerer, RecordStore, StoreError, StoreResult,
};
