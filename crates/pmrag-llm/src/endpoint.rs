//! Request routing shared by the chat and embedding clients
//!
//! OpenAI and Azure OpenAI speak the same JSON bodies but differ in url layout and
//! authentication header.

use pmrag_config::{ApiCredentials, ApiProvider};

/// Where and how to send requests for one model
#[derive(Clone)]
pub struct ApiEndpoint {
    provider: ApiProvider,
    base_url: String,
    api_key: String,
    api_version: Option<String>,
    model: String,
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ApiEndpoint {
    /// Build from resolved credentials and a model (deployment name on Azure)
    pub fn new(credentials: ApiCredentials, model: impl Into<String>) -> Self {
        Self {
            provider: credentials.provider,
            base_url: credentials.endpoint,
            api_key: credentials.api_key,
            api_version: credentials.api_version,
            model: model.into(),
        }
    }

    /// OpenAI endpoint at `base_url`
    pub fn openai(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ApiProvider::OpenAI,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: None,
            model: model.into(),
        }
    }

    /// Azure deployment under `resource_endpoint`
    pub fn azure(
        resource_endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            provider: ApiProvider::Azure,
            base_url: resource_endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: Some(api_version.into()),
            model: deployment.into(),
        }
    }

    /// Model or deployment name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// API flavour
    pub fn provider(&self) -> ApiProvider {
        self.provider
    }

    /// Full url for an operation such as `chat/completions` or `embeddings`
    pub fn url(&self, operation: &str) -> String {
        match self.provider {
            ApiProvider::OpenAI => format!("{}/{}", self.base_url, operation),
            ApiProvider::Azure => format!(
                "{}/openai/deployments/{}/{}?api-version={}",
                self.base_url,
                self.model,
                operation,
                self.api_version.as_deref().unwrap_or_default()
            ),
        }
    }

    /// Attach authentication for this flavour
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.provider {
            ApiProvider::OpenAI => {
                request.header("Authorization", format!("Bearer {}", self.api_key))
            }
            ApiProvider::Azure => request.header("api-key", &self.api_key),
        }
    }

    /// Whether the request body must carry a `model` field
    pub fn sends_model(&self) -> bool {
        self.provider == ApiProvider::OpenAI
    }
}
