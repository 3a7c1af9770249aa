//! Scripted chat provider for tests

use async_trait::async_trait;
use pmrag_core::{ChatProvider, ChatRequest, ChatResponse, LlmError, LlmResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replies with queued responses in order and records every request
pub struct MockChatProvider {
    responses: Mutex<VecDeque<LlmResult<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    fallback: Option<String>,
}

impl MockChatProvider {
    /// Provider that replies with `responses` in order, then errors
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
            fallback: None,
        }
    }

    /// Provider that always replies with `response`
    pub fn constant(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback: Some(response.into()),
        }
    }

    /// Queue an error as the next reply
    pub fn push_error(&self, error: LlmError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<LlmResult<String>>> {
        match self.responses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn chat(&self, request: ChatRequest) -> LlmResult<ChatResponse> {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }

        let next = self.lock_responses().pop_front();
        let content = match (next, &self.fallback) {
            (Some(result), _) => result?,
            (None, Some(fallback)) => fallback.clone(),
            (None, None) => {
                return Err(LlmError::InvalidResponse(
                    "mock chat provider has no more responses".to_string(),
                ))
            }
        };

        Ok(ChatResponse {
            content,
            model: "mock-chat".to_string(),
            total_tokens: None,
        })
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_errors() {
        let provider = MockChatProvider::with_responses(["one", "two"]);
        let first = provider.chat(ChatRequest::new("s", "a")).await.unwrap();
        let second = provider.chat(ChatRequest::new("s", "b")).await.unwrap();
        assert_eq!(first.content, "one");
        assert_eq!(second.content, "two");
        assert!(provider.chat(ChatRequest::new("s", "c")).await.is_err());
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.requests()[1].last_user_message(), Some("b"));
    }

    #[tokio::test]
    async fn test_queued_error() {
        let provider = MockChatProvider::constant("ok");
        provider.push_error(LlmError::HttpError("down".to_string()));
        assert!(provider.chat(ChatRequest::new("s", "a")).await.is_err());
        assert_eq!(provider.chat(ChatRequest::new("s", "a")).await.unwrap().content, "ok");
    }
}
