//! Tests for structured calls: sanitising, parsing, token accounting

use std::sync::{Arc, Mutex};

use pomaia_providers::{
    ChatCompletion, ChatRequest, Provider, ProviderError, StructuredCaller,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Mock provider that replays one completion and records requests
struct ReplayProvider {
    completion: ChatCompletion,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ReplayProvider {
    fn new(completion: ChatCompletion) -> Arc<Self> {
        Arc::new(Self {
            completion,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl Provider for ReplayProvider {
    fn id(&self) -> &str {
        "replay"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatCompletion, ProviderError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.completion.clone())
    }
}

/// Mock provider that always fails at the transport level
struct OfflineProvider;

#[async_trait::async_trait]
impl Provider for OfflineProvider {
    fn id(&self) -> &str {
        "offline"
    }

    async fn chat(&self, _request: ChatRequest) -> Result<ChatCompletion, ProviderError> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Quotes {
    quotes: Vec<Value>,
}

#[tokio::test]
async fn test_empty_content_yields_empty_object() {
    let provider = ReplayProvider::new(ChatCompletion::from_content("", 3));
    let caller = StructuredCaller::new(provider, "m");

    let reply = caller.call::<Value>("sys", "usr").await.unwrap();
    assert_eq!(reply.result, json!({}));
    assert_eq!(reply.tokens_used, 3);
}

#[tokio::test]
async fn test_absent_content_and_usage() {
    let provider = ReplayProvider::new(ChatCompletion::default());
    let caller = StructuredCaller::new(provider, "m");

    let reply = caller.call::<Value>("sys", "usr").await.unwrap();
    assert_eq!(reply.result, json!({}));
    assert_eq!(reply.tokens_used, 0);
}

#[tokio::test]
async fn test_malformed_content_is_parse_error() {
    let provider = ReplayProvider::new(ChatCompletion::from_content("Sure! Here are quotes:", 5));
    let caller = StructuredCaller::new(provider, "m");

    let err = caller.call::<Value>("sys", "usr").await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)));
}

#[tokio::test]
async fn test_fenced_reply_with_trailing_comma_decodes() {
    let content = "```json\n{\"quotes\": [{\"original\": \"a\", \"suggestion\": \"b\"},]}\n```";
    let provider = ReplayProvider::new(ChatCompletion::from_content(content, 11));
    let caller = StructuredCaller::new(provider, "m");

    let reply = caller.call::<Quotes>("sys", "usr").await.unwrap();
    assert_eq!(reply.result.quotes.len(), 1);
    assert_eq!(reply.tokens_used, 11);
}

#[tokio::test]
async fn test_missing_field_is_shape_error() {
    let provider = ReplayProvider::new(ChatCompletion::from_content("{}", 2));
    let caller = StructuredCaller::new(provider, "m");

    let err = caller.call::<Quotes>("sys", "usr").await.unwrap_err();
    assert!(matches!(err, ProviderError::Shape(_)));
}

#[tokio::test]
async fn test_transport_error_propagates_unmodified() {
    let caller = StructuredCaller::new(Arc::new(OfflineProvider), "m");

    let err = caller.call::<Value>("sys", "usr").await.unwrap_err();
    assert_eq!(err, ProviderError::Transport("connection refused".to_string()));
}

#[tokio::test]
async fn test_request_has_system_then_user() {
    let provider = ReplayProvider::new(ChatCompletion::from_content("{}", 1));
    let caller = StructuredCaller::new(provider.clone(), "gemma2:9b").with_temperature(Some(0.2));

    caller.call::<Value>("the system", "the user").await.unwrap();

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model, "gemma2:9b");
    assert_eq!(request.temperature, Some(0.2));
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.messages[0].content, "the system");
    assert_eq!(request.messages[1].role, "user");
    assert_eq!(request.messages[1].content, "the user");
}
