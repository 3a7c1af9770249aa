//! Chat model abstraction
//!
//! The model is an opaque text-completion service: a system prompt and a user prompt go
//! in, text comes out. No structure is expected from the output beyond what the agent
//! parses itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result type for chat operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Chat model errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Transport failure talking to the model endpoint
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The endpoint answered with something we could not use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider misconfiguration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions
    System,
    /// The question side
    User,
    /// Model output
    Assistant,
}

impl MessageRole {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: MessageRole,
    /// Text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature, provider default when `None`
    pub temperature: Option<f32>,
    /// Completion token limit, provider default when `None`
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request with a system prompt and a user prompt
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The last user message, if any
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Total tokens billed, when reported
    pub total_tokens: Option<u32>,
}

/// Chat completion provider
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one chat completion
    async fn chat(&self, request: ChatRequest) -> LlmResult<ChatResponse>;

    /// Model used for completions
    fn model_name(&self) -> &str;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: ChatProvider + ?Sized> ChatProvider for Arc<T> {
    async fn chat(&self, request: ChatRequest) -> LlmResult<ChatResponse> {
        (**self).chat(request).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}
