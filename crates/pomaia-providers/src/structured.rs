//! Structured (JSON) calls against an oracle
//!
//! One system message, one user message, one reply. The first choice's content is
//! sanitised and parsed; nothing is retried and nothing is guessed.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::ProviderError,
    models::ChatRequest,
    provider::Provider,
    sanitize::sanitize_reply,
};

/// Parsed result of a structured call plus the tokens the oracle reported
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredReply<T> {
    pub result: T,
    pub tokens_used: u64,
}

/// Issues structured calls against a shared provider with a fixed model
#[derive(Clone)]
pub struct StructuredCaller {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f32>,
}

impl StructuredCaller {
    /// Create a caller for the given provider and model
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
        }
    }

    /// Set the sampling temperature sent with every request
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The underlying provider
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Send `system` + `user` and decode the reply as `T`.
    ///
    /// An empty (or absent) reply decodes from `{}`. A non-empty reply that is not
    /// valid JSON after sanitising is a [`ProviderError::Parse`]; valid JSON that does
    /// not fit `T` is a [`ProviderError::Shape`].
    pub async fn call<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<StructuredReply<T>, ProviderError> {
        let request = ChatRequest::with_system(self.model.as_str(), system, user)
            .temperature(self.temperature);

        debug!(
            provider = self.provider.id(),
            model = %self.model,
            user_chars = user.len(),
            "Sending structured request"
        );

        let completion = self.provider.chat(request).await?;
        let tokens_used = completion.total_tokens();
        let value = parse_reply(completion.first_content())?;

        let result = serde_json::from_value::<T>(value).map_err(|e| {
            warn!(error = %e, "Structured reply did not match the expected shape");
            ProviderError::Shape(e.to_string())
        })?;

        debug!(tokens_used, "Structured reply decoded");

        Ok(StructuredReply {
            result,
            tokens_used,
        })
    }
}

/// Sanitise and parse raw reply content; empty content parses as `{}`
pub fn parse_reply(raw: &str) -> Result<Value, ProviderError> {
    let cleaned = sanitize_reply(raw);
    if cleaned.is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(&cleaned).map_err(|e| {
        warn!(error = %e, "Oracle reply is not valid JSON");
        ProviderError::Parse(e.to_string())
    })
}
