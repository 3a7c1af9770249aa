//! Chat and embedding API settings

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, EnvLookup};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AZURE_API_VERSION: &str = "2023-07-01-preview";

/// Which OpenAI-compatible API flavour to talk to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    /// api.openai.com (or a compatible base url)
    OpenAI,
    /// Azure OpenAI deployments
    #[default]
    Azure,
}

/// Connection part shared by [`LlmConfig`] and [`EmbeddingConfig`]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// API flavour
    #[serde(default)]
    pub provider: ApiProvider,
    /// Base url (OpenAI) or resource endpoint (Azure, `AZURE_OPENAI_ENDPOINT`)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Key (`OPENAI_API_KEY` or `AZURE_OPENAI_API_KEY`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Azure api-version query parameter (`OPENAI_API_VERSION`)
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Resolved API settings
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    /// API flavour
    pub provider: ApiProvider,
    /// Base url without trailing slash
    pub endpoint: String,
    /// Key
    pub api_key: String,
    /// Azure api-version, `None` for OpenAI
    pub api_version: Option<String>,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ApiConfig {
    /// Fill key, endpoint and version from the environment for the configured provider
    pub fn apply_env(&mut self, env: &dyn EnvLookup) {
        match self.provider {
            ApiProvider::OpenAI => {
                if let Some(key) = env.get("OPENAI_API_KEY") {
                    self.api_key = Some(key);
                }
                if let Some(base) = env.get("OPENAI_BASE_URL") {
                    self.endpoint = Some(base);
                }
            }
            ApiProvider::Azure => {
                if let Some(key) = env.get("AZURE_OPENAI_API_KEY") {
                    self.api_key = Some(key);
                }
                if let Some(endpoint) = env.get("AZURE_OPENAI_ENDPOINT") {
                    self.endpoint = Some(endpoint);
                }
                if let Some(version) = env.get("OPENAI_API_VERSION") {
                    self.api_version = Some(version);
                }
            }
        }
    }

    /// Resolved credentials for the configured provider
    pub fn credentials(&self) -> ConfigResult<ApiCredentials> {
        let creds = match self.provider {
            ApiProvider::OpenAI => ApiCredentials {
                provider: ApiProvider::OpenAI,
                endpoint: self
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
                api_key: self
                    .api_key
                    .clone()
                    .ok_or_else(|| ConfigError::MissingEnv("OPENAI_API_KEY".to_string()))?,
                api_version: None,
            },
            ApiProvider::Azure => ApiCredentials {
                provider: ApiProvider::Azure,
                endpoint: self.endpoint.clone().ok_or_else(|| {
                    ConfigError::MissingEnv("AZURE_OPENAI_ENDPOINT".to_string())
                })?,
                api_key: self.api_key.clone().ok_or_else(|| {
                    ConfigError::MissingEnv("AZURE_OPENAI_API_KEY".to_string())
                })?,
                api_version: Some(
                    self.api_version
                        .clone()
                        .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
                ),
            },
        };
        Ok(ApiCredentials {
            endpoint: creds.endpoint.trim_end_matches('/').to_string(),
            ..creds
        })
    }
}

/// Chat model section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Connection settings
    #[serde(flatten)]
    pub api: ApiConfig,
    /// Model name, or deployment name on Azure
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,
    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            model: default_chat_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Embedding model section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Connection settings
    #[serde(flatten)]
    pub api: ApiConfig,
    /// Model name, or deployment name on Azure
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Expected vector length
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Texts per embeddings request during ingestion
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_dimensions() -> usize {
    1536
}

fn default_batch_size() -> usize {
    16
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            model: default_embedding_model(),
            dimensions: default_dimensions(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "llm.max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl EmbeddingConfig {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "embedding.batch_size must be at least 1".to_string(),
            ));
        }
        if self.dimensions == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_azure_credentials_default_version() {
        let env: HashMap<&str, &str> = [
            ("AZURE_OPENAI_API_KEY", "k"),
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com/"),
        ]
        .into_iter()
        .collect();
        let mut api = ApiConfig::default();
        api.apply_env(&env);
        let creds = api.credentials().unwrap();
        assert_eq!(creds.endpoint, "https://res.openai.azure.com");
        assert_eq!(creds.api_version.as_deref(), Some(DEFAULT_AZURE_API_VERSION));
    }

    #[test]
    fn test_openai_ignores_azure_vars() {
        let env: HashMap<&str, &str> = [("AZURE_OPENAI_API_KEY", "k")].into_iter().collect();
        let mut api = ApiConfig {
            provider: ApiProvider::OpenAI,
            ..Default::default()
        };
        api.apply_env(&env);
        assert!(matches!(
            api.credentials(),
            Err(ConfigError::MissingEnv(ref v)) if v == "OPENAI_API_KEY"
        ));
    }

    #[test]
    fn test_openai_default_base_url() {
        let env: HashMap<&str, &str> = [("OPENAI_API_KEY", "sk-test")].into_iter().collect();
        let mut api = ApiConfig {
            provider: ApiProvider::OpenAI,
            ..Default::default()
        };
        api.apply_env(&env);
        let creds = api.credentials().unwrap();
        assert_eq!(creds.endpoint, OPENAI_BASE_URL);
        assert!(creds.api_version.is_none());
        assert!(!format!("{creds:?}").contains("sk-test"));
    }

    #[test]
    fn test_llm_defaults() {
        let llm = LlmConfig::default();
        assert_eq!(llm.model, "gpt-4");
        assert_eq!(llm.temperature, 0.0);
        assert_eq!(llm.max_tokens, 500);
        assert!(llm.validate().is_ok());
    }

    #[test]
    fn test_embedding_zero_batch_rejected() {
        let embedding = EmbeddingConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(embedding.validate().is_err());
    }
}
