//! Query agent settings

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Agent section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Query-generation cycles before giving up
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u32,
    /// Similarity threshold for the Postgres store
    #[serde(default = "default_sql_threshold")]
    pub sql_threshold: f64,
    /// Similarity threshold for the Neo4j store
    #[serde(default = "default_graph_threshold")]
    pub graph_threshold: f64,
    /// Answer returned when no evidence was found
    #[serde(default = "default_cannot_answer")]
    pub cannot_answer: String,
}

fn default_max_cycles() -> u32 {
    2
}

fn default_sql_threshold() -> f64 {
    0.8
}

fn default_graph_threshold() -> f64 {
    0.75
}

fn default_cannot_answer() -> String {
    "I'm sorry, I could not find an answer to that question in the available data."
        .to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            sql_threshold: default_sql_threshold(),
            graph_threshold: default_graph_threshold(),
            cannot_answer: default_cannot_answer(),
        }
    }
}

impl AgentConfig {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.max_cycles == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_cycles must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("agent.sql_threshold", self.sql_threshold),
            ("agent.graph_threshold", self.graph_threshold),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within -1.0..=1.0, got {value}"
                )));
            }
        }
        if self.cannot_answer.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "agent.cannot_answer must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
