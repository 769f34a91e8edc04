//! OpenAI-compatible HTTP oracle
//!
//! Talks to any server exposing `POST /chat/completions` in the OpenAI format:
//! Ollama's `/v1` endpoint, llama.cpp's server, LM Studio and friends. Everything
//! runs on the local machine; no text leaves it unless the base URL says otherwise.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::{
    config::OracleConfig,
    error::ProviderError,
    models::{ChatCompletion, ChatRequest},
    provider::Provider,
};

/// OpenAI-compatible provider implementation
pub struct OpenAiCompatProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Create a provider for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::build(base_url.into(), None, Duration::from_secs(300))
    }

    /// Create a provider from loaded configuration
    pub fn from_config(config: &OracleConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Self::build(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if base_url.is_empty() {
            return Err(ProviderError::ConfigError(
                "Oracle base URL is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn id(&self) -> &str {
        "openai-compatible"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatCompletion, ProviderError> {
        debug!(
            "Sending chat request to {} for model: {}",
            self.base_url, request.model
        );

        let response = self
            .authorize(
                self.client
                    .post(format!("{}/chat/completions", self.base_url))
                    .json(&request),
            )
            .send()
            .await
            .map_err(|e| {
                error!("Oracle request failed: {}", e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Oracle API error ({}): {}", status, error_text);
            return Err(ProviderError::Transport(format!(
                "Oracle API error: {}",
                status
            )));
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            error!("Failed to parse oracle response: {}", e);
            ProviderError::SerializationError(format!("Failed to parse oracle response: {}", e))
        })?;

        Ok(completion)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        debug!("Performing health check against {}", self.base_url);

        let response = self
            .authorize(self.client.get(format!("{}/models", self.base_url)))
            .send()
            .await
            .map_err(|e| {
                warn!("Oracle health check failed: {}", e);
                ProviderError::from(e)
            })?;

        if response.status().is_success() {
            debug!("Oracle health check passed");
            Ok(true)
        } else {
            warn!(
                "Oracle health check failed with status: {}",
                response.status()
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiCompatProvider::new("http://localhost:11434/v1/");
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().base_url(), "http://localhost:11434/v1");
    }

    #[test]
    fn test_provider_creation_empty_url() {
        let provider = OpenAiCompatProvider::new("");
        assert!(provider.is_err());
    }

    #[test]
    fn test_provider_from_invalid_config() {
        let config = OracleConfig {
            model: String::new(),
            ..OracleConfig::default()
        };
        assert!(OpenAiCompatProvider::from_config(&config).is_err());
    }
}
