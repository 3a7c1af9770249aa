//! Configuration sections

mod agent;
mod api;
mod eval;
mod neo4j;
mod postgres;

pub use agent::AgentConfig;
pub use api::{ApiConfig, ApiCredentials, ApiProvider, EmbeddingConfig, LlmConfig};
pub use eval::EvalConfig;
pub use neo4j::{Neo4jConfig, Neo4jConnection};
pub use postgres::{PostgresConfig, PostgresConnection};
