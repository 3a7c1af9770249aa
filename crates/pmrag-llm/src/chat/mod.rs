//! Chat provider implementations

pub mod openai;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use openai::OpenAIChatProvider;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockChatProvider;

use pmrag_config::LlmConfig;
use pmrag_core::{ChatProvider, LlmError, LlmResult};
use std::sync::Arc;
use tracing::info;

use crate::endpoint::ApiEndpoint;

/// Create a chat provider from configuration
pub fn create_chat_provider(config: &LlmConfig) -> LlmResult<Arc<dyn ChatProvider>> {
    let credentials = config
        .api
        .credentials()
        .map_err(|e| LlmError::ConfigError(e.to_string()))?;
    let endpoint = ApiEndpoint::new(credentials, config.model.clone());

    let provider = OpenAIChatProvider::new(
        endpoint,
        config.temperature,
        config.max_tokens,
        config.timeout_secs,
    );
    info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        "chat provider ready"
    );
    Ok(Arc::new(provider))
}
