//! Root configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{
    AgentConfig, ConfigResult, EmbeddingConfig, EnvLookup, EvalConfig, LlmConfig, Neo4jConfig,
    PostgresConfig,
};

/// Logging section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Filter directive or plain level (`info`, `pmrag_agent=debug`)
    #[serde(default)]
    pub level: Option<String>,
}

/// Complete pmrag configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Postgres store
    #[serde(default)]
    pub postgres: PostgresConfig,
    /// Neo4j store
    #[serde(default)]
    pub neo4j: Neo4jConfig,
    /// Chat model
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding model
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Query agent
    #[serde(default)]
    pub agent: AgentConfig,
    /// Evaluator
    #[serde(default)]
    pub eval: EvalConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from `path` (or `pmrag.toml` when present), overlay the environment, validate
    pub fn load(path: Option<&Path>, env: &dyn EnvLookup) -> ConfigResult<Self> {
        let mut config = crate::loader::read_file(path)?;
        config.apply_env(env)?;
        config.validate()?;
        debug!(
            max_cycles = config.agent.max_cycles,
            sql_threshold = config.agent.sql_threshold,
            graph_threshold = config.agent.graph_threshold,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse TOML text without touching the environment
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay environment variables on every section
    pub fn apply_env(&mut self, env: &dyn EnvLookup) -> ConfigResult<()> {
        self.postgres.apply_env(env)?;
        self.neo4j.apply_env(env)?;
        self.llm.api.apply_env(env);
        self.embedding.api.apply_env(env);
        Ok(())
    }

    /// Check value ranges. Connection settings are checked lazily by each section
    pub fn validate(&self) -> ConfigResult<()> {
        self.postgres.validate()?;
        self.llm.validate()?;
        self.embedding.validate()?;
        self.agent.validate()?;
        Ok(())
    }
}
