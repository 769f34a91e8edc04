//! Error types for the providers module

use thiserror::Error;

/// Errors that can occur when talking to an oracle
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// The call to the oracle itself failed (connection, timeout, non-2xx status)
    #[error("Oracle transport error: {0}")]
    Transport(String),

    /// The sanitised reply was not valid JSON
    #[error("Structured reply parse error: {0}")]
    Parse(String),

    /// The reply parsed as JSON but did not have the expected shape
    #[error("Structured reply shape mismatch: {0}")]
    Shape(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error on the wire format
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Transport(format!("Request timeout: {}", err))
        } else if err.is_decode() {
            ProviderError::SerializationError(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
