//! Neo4j store for pmrag
//!
//! Talks to Neo4j through its HTTP transactional endpoint with `reqwest`, so no Bolt
//! driver is needed and tests can run against a mock server.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pmrag_neo4j::Neo4jStore;
//! use pmrag_core::RecordStore;
//!
//! let store = Neo4jStore::connect(&config.neo4j)?;
//! let rows = store.execute("MATCH (e:Epic) RETURN count(e) AS epics").await?;
//! ```

pub mod client;
pub mod error;
pub mod ingest;
pub mod schema;
pub mod store;

// Re-exports
pub use client::Neo4jClient;
pub use error::{Neo4jError, Neo4jResult};
pub use ingest::{GraphIngestor, GraphLoadReport, NodeEmbeddingReport};
pub use schema::GraphSchema;
pub use store::Neo4jStore;
