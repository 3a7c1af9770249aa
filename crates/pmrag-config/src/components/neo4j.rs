//! Neo4j HTTP endpoint settings

use serde::{Deserialize, Serialize};

use super::postgres::required;
use crate::{ConfigResult, EnvLookup};

/// Neo4j section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jConfig {
    /// HTTP base url, e.g. `http://localhost:7474` (`NEO4J_URL`)
    #[serde(default)]
    pub url: Option<String>,
    /// User (`NEO4J_USERNAME`)
    #[serde(default)]
    pub username: Option<String>,
    /// Password (`NEO4J_PASSWORD`)
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Database name (`NEO4J_DATABASE`)
    #[serde(default = "default_database")]
    pub database: String,
    /// Node property holding the embedding
    #[serde(default = "default_embedding_property")]
    pub embedding_property: String,
    /// Node properties concatenated into the embedded text
    #[serde(default = "default_text_properties")]
    pub text_properties: Vec<String>,
    /// Request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database() -> String {
    "neo4j".to_string()
}

fn default_embedding_property() -> String {
    "embedding".to_string()
}

fn default_text_properties() -> Vec<String> {
    vec!["pylabel".to_string(), "description".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            database: default_database(),
            embedding_property: default_embedding_property(),
            text_properties: default_text_properties(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Resolved Neo4j connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct Neo4jConnection {
    /// Base url without trailing slash
    pub url: String,
    /// User
    pub username: String,
    /// Password
    pub password: String,
    /// Database
    pub database: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for Neo4jConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jConnection")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl Neo4jConfig {
    /// Fill connection fields from the environment
    pub fn apply_env(&mut self, env: &dyn EnvLookup) -> ConfigResult<()> {
        if let Some(url) = env.get("NEO4J_URL") {
            self.url = Some(url);
        }
        if let Some(username) = env.get("NEO4J_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = env.get("NEO4J_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(database) = env.get("NEO4J_DATABASE") {
            self.database = database;
        }
        Ok(())
    }

    /// Resolved connection settings
    pub fn connection(&self) -> ConfigResult<Neo4jConnection> {
        let url = required(&self.url, "NEO4J_URL")?;
        Ok(Neo4jConnection {
            url: url.trim_end_matches('/').to_string(),
            username: required(&self.username, "NEO4J_USERNAME")?,
            password: required(&self.password, "NEO4J_PASSWORD")?,
            database: self.database.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use std::collections::HashMap;

    #[test]
    fn test_connection_trims_trailing_slash() {
        let env: HashMap<&str, &str> = [
            ("NEO4J_URL", "http://localhost:7474/"),
            ("NEO4J_USERNAME", "neo4j"),
            ("NEO4J_PASSWORD", "pw"),
        ]
        .into_iter()
        .collect();
        let mut config = Neo4jConfig::default();
        config.apply_env(&env).unwrap();
        let conn = config.connection().unwrap();
        assert_eq!(conn.url, "http://localhost:7474");
        assert_eq!(conn.database, "neo4j");
    }

    #[test]
    fn test_database_override() {
        let env: HashMap<&str, &str> = [("NEO4J_DATABASE", "pm")].into_iter().collect();
        let mut config = Neo4jConfig::default();
        config.apply_env(&env).unwrap();
        assert_eq!(config.database, "pm");
    }

    #[test]
    fn test_missing_url() {
        let config = Neo4jConfig::default();
        assert!(matches!(
            config.connection(),
            Err(ConfigError::MissingEnv(ref v)) if v == "NEO4J_URL"
        ));
    }
}
