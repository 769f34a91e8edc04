//! Oracle trait

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    models::{ChatCompletion, ChatRequest},
};

/// A text-generation oracle: one request in, one completion out.
///
/// Implementations are expected to be already loaded and ready; model lifecycle is
/// the implementation's own business.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatCompletion, ProviderError>;

    /// Check if the provider is available and healthy
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}
