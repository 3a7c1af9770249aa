//! HTTP contract tests for the chat and embedding providers against a mock server

use pmrag_core::{ChatProvider, ChatRequest, EmbeddingError, EmbeddingProvider, LlmError};
use pmrag_llm::{ApiEndpoint, OpenAIChatProvider, OpenAIProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

#[tokio::test]
async fn openai_chat_sends_bearer_and_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-4", "temperature": 0.0, "max_tokens": 500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Final Answer: 3")))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = ApiEndpoint::openai(format!("{}/v1", server.uri()), "sk-test", "gpt-4");
    let provider = OpenAIChatProvider::new(endpoint, 0.0, 500, 10);

    let response = provider
        .chat(ChatRequest::new("system", "How many epics?"))
        .await
        .unwrap();

    assert_eq!(response.content, "Final Answer: 3");
    assert_eq!(response.total_tokens, Some(15));
}

#[tokio::test]
async fn azure_chat_uses_deployment_url_and_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt4-deploy/chat/completions"))
        .and(query_param("api-version", "2023-07-01-preview"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = ApiEndpoint::azure(server.uri(), "azure-key", "gpt4-deploy", "2023-07-01-preview");
    let provider = OpenAIChatProvider::new(endpoint, 0.0, 100, 10);

    let response = provider.chat(ChatRequest::new("s", "u")).await.unwrap();
    assert_eq!(response.content, "hello");
}

#[tokio::test]
async fn chat_error_status_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let provider = OpenAIChatProvider::new(ApiEndpoint::openai(server.uri(), "k", "gpt-4"), 0.0, 100, 10);
    let err = provider.chat(ChatRequest::new("s", "u")).await.unwrap_err();

    match err {
        LlmError::InvalidResponse(msg) => assert!(msg.contains("rate limited")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn chat_without_choices_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAIChatProvider::new(ApiEndpoint::openai(server.uri(), "k", "gpt-4"), 0.0, 100, 10);
    assert!(provider.chat(ChatRequest::new("s", "u")).await.is_err());
}

#[tokio::test]
async fn embeddings_are_reordered_by_index() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({ "model": "text-embedding-ada-002", "input": ["first", "second"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "model": "text-embedding-ada-002",
            "data": [
                { "object": "embedding", "index": 1, "embedding": [0.0, 1.0] },
                { "object": "embedding", "index": 0, "embedding": [1.0, 0.0] }
            ]
        })))
        .mount(&server)
        .await;

    let endpoint = ApiEndpoint::openai(server.uri(), "k", "text-embedding-ada-002");
    let provider = OpenAIProvider::new(endpoint, 2, 10);

    let responses = provider
        .embed_batch(vec!["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(responses[0].embedding, vec![1.0, 0.0]);
    assert_eq!(responses[1].embedding, vec![0.0, 1.0]);
}

#[tokio::test]
async fn embedding_dimension_mismatch_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [0.1, 0.2, 0.3] }]
        })))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(ApiEndpoint::openai(server.uri(), "k", "m"), 1536, 10);
    let err = provider.embed("query").await.unwrap_err();

    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch { expected: 1536, actual: 3 }
    ));
}

#[tokio::test]
async fn embedding_server_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/ada/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let endpoint = ApiEndpoint::azure(server.uri(), "k", "ada", "2023-07-01-preview");
    let provider = OpenAIProvider::new(endpoint, 2, 10);

    assert!(matches!(
        provider.embed("query").await,
        Err(EmbeddingError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn empty_batch_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(ApiEndpoint::openai(server.uri(), "k", "m"), 2, 10);
    assert!(provider.embed_batch(Vec::new()).await.unwrap().is_empty());
}
