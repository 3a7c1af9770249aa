//! Postgres connection and table layout

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, EnvLookup};

/// Postgres section
///
/// Connection fields come from `POSTGRES_*` variables; the rest describes the
/// embedded table and usually lives in the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Server host (`POSTGRES_HOST`)
    #[serde(default)]
    pub host: Option<String>,
    /// Server port (`POSTGRES_PORT`)
    #[serde(default)]
    pub port: Option<u16>,
    /// Database name (`POSTGRES_DB`)
    #[serde(default)]
    pub database: Option<String>,
    /// User name (`POSTGRES_USER`)
    #[serde(default)]
    pub user: Option<String>,
    /// Password (`POSTGRES_PASSWORD`), never written back out
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Schema holding the data table
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Table with the project-management records
    #[serde(default = "default_table")]
    pub table: String,
    /// Primary identifier column
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Human readable label column
    #[serde(default = "default_label_column")]
    pub label_column: String,
    /// Column holding the stored embedding
    #[serde(default = "default_embedding_column")]
    pub embedding_column: String,
    /// Columns concatenated into the text that gets embedded
    #[serde(default = "default_text_columns")]
    pub text_columns: Vec<String>,
    /// Example rows shown to the model with the schema
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_table() -> String {
    "data_filtered".to_string()
}

fn default_id_column() -> String {
    "pyid".to_string()
}

fn default_label_column() -> String {
    "pylabel".to_string()
}

fn default_embedding_column() -> String {
    "embeddings".to_string()
}

fn default_text_columns() -> Vec<String> {
    vec!["pylabel".to_string(), "description".to_string()]
}

fn default_sample_rows() -> usize {
    3
}

fn default_max_connections() -> u32 {
    5
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            database: None,
            user: None,
            password: None,
            schema: default_schema(),
            table: default_table(),
            id_column: default_id_column(),
            label_column: default_label_column(),
            embedding_column: default_embedding_column(),
            text_columns: default_text_columns(),
            sample_rows: default_sample_rows(),
            max_connections: default_max_connections(),
        }
    }
}

/// Fully resolved Postgres connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConnection {
    /// Host
    pub host: String,
    /// Port
    pub port: u16,
    /// Database
    pub database: String,
    /// User
    pub user: String,
    /// Password
    pub password: String,
}

impl std::fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl PostgresConfig {
    /// Fill connection fields from the environment; set variables win over the file
    pub fn apply_env(&mut self, env: &dyn EnvLookup) -> ConfigResult<()> {
        if let Some(host) = env.get("POSTGRES_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = env.get("POSTGRES_PORT") {
            let port = port.trim().parse::<u16>().map_err(|_| {
                ConfigError::Invalid(format!("POSTGRES_PORT is not a valid port: {port}"))
            })?;
            self.port = Some(port);
        }
        if let Some(db) = env.get("POSTGRES_DB") {
            self.database = Some(db);
        }
        if let Some(user) = env.get("POSTGRES_USER") {
            self.user = Some(user);
        }
        if let Some(password) = env.get("POSTGRES_PASSWORD") {
            self.password = Some(password);
        }
        Ok(())
    }

    /// Resolved connection settings, failing on the first missing one
    pub fn connection(&self) -> ConfigResult<PostgresConnection> {
        Ok(PostgresConnection {
            host: required(&self.host, "POSTGRES_HOST")?,
            port: self
                .port
                .ok_or_else(|| ConfigError::MissingEnv("POSTGRES_PORT".to_string()))?,
            database: required(&self.database, "POSTGRES_DB")?,
            user: required(&self.user, "POSTGRES_USER")?,
            password: required(&self.password, "POSTGRES_PASSWORD")?,
        })
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.text_columns.is_empty() {
            return Err(ConfigError::Invalid(
                "postgres.text_columns must name at least one column".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "postgres.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn required(value: &Option<String>, var: &str) -> ConfigResult<String> {
    value
        .clone()
        .ok_or_else(|| ConfigError::MissingEnv(var.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        [
            ("POSTGRES_HOST", "localhost"),
            ("POSTGRES_PORT", "5432"),
            ("POSTGRES_DB", "pm"),
            ("POSTGRES_USER", "postgres"),
            ("POSTGRES_PASSWORD", "secret"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_connection_from_env() {
        let mut config = PostgresConfig::default();
        config.apply_env(&full_env()).unwrap();
        let conn = config.connection().unwrap();
        assert_eq!(conn.host, "localhost");
        assert_eq!(conn.port, 5432);
        assert_eq!(conn.database, "pm");
    }

    #[test]
    fn test_missing_password_is_named() {
        let mut env = full_env();
        env.remove("POSTGRES_PASSWORD");
        let mut config = PostgresConfig::default();
        config.apply_env(&env).unwrap();
        let err = config.connection().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(ref v) if v == "POSTGRES_PASSWORD"));
        assert_eq!(err.to_string(), "Environment variable POSTGRES_PASSWORD not set.");
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut env = full_env();
        env.insert("POSTGRES_PORT", "not-a-port");
        let mut config = PostgresConfig::default();
        assert!(matches!(
            config.apply_env(&env),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = PostgresConfig::default();
        config.apply_env(&full_env()).unwrap();
        let rendered = format!("{:?}", config.connection().unwrap());
        assert!(!rendered.contains("secret"));
    }
}
