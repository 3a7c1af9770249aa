//! OpenAI / Azure OpenAI chat provider

use async_trait::async_trait;
use pmrag_core::{ChatProvider, ChatRequest, ChatResponse, LlmError, LlmResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::endpoint::ApiEndpoint;

/// Chat completions over the OpenAI wire format
pub struct OpenAIChatProvider {
    client: reqwest::Client,
    endpoint: ApiEndpoint,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAIChatProvider {
    /// Create a provider. `temperature` and `max_tokens` apply when a request leaves them unset
    pub fn new(endpoint: ApiEndpoint, temperature: f32, max_tokens: u32, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            temperature,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAIChatProvider {
    async fn chat(&self, request: ChatRequest) -> LlmResult<ChatResponse> {
        let mut api_request = serde_json::json!({
            "messages": request.messages.iter().map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            }).collect::<Vec<_>>(),
            "temperature": request.temperature.unwrap_or(self.temperature),
            "max_tokens": request.max_tokens.unwrap_or(self.max_tokens),
        });

        if self.endpoint.sends_model() {
            api_request["model"] = serde_json::json!(self.endpoint.model());
        }

        let url = self.endpoint.url("chat/completions");
        debug!(model = self.endpoint.model(), messages = request.messages.len(), "chat request");

        let response = self
            .endpoint
            .authorize(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::InvalidResponse(format!(
                "{} API error ({}): {}",
                self.provider_name(),
                status,
                error_text
            )));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(chars = content.len(), "chat response");

        Ok(ChatResponse {
            content,
            model: openai_response
                .model
                .unwrap_or_else(|| self.endpoint.model().to_string()),
            total_tokens: openai_response.usage.map(|u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        self.endpoint.model()
    }

    fn provider_name(&self) -> &str {
        match self.endpoint.provider() {
            pmrag_config::ApiProvider::OpenAI => "OpenAI",
            pmrag_config::ApiProvider::Azure => "Azure OpenAI",
        }
    }
}

// OpenAI API response types
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAIChatProvider::new(
            ApiEndpoint::openai("https://api.openai.com/v1", "sk-test-key", "gpt-4"),
            0.0,
            500,
            60,
        );

        assert_eq!(provider.provider_name(), "OpenAI");
        assert_eq!(provider.model_name(), "gpt-4");
    }

    #[test]
    fn test_azure_provider_name() {
        let provider = OpenAIChatProvider::new(
            ApiEndpoint::azure("https://res.openai.azure.com", "k", "gpt-4", "2023-07-01-preview"),
            0.0,
            500,
            60,
        );
        assert_eq!(provider.provider_name(), "Azure OpenAI");
    }
}
