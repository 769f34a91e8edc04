//! Pipeline error types

use pomaia_chunking::ChunkingError;
use pomaia_providers::ProviderError;
use pomaia_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the pipeline stages and the orchestrator
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Oracle transport or reply-parse failure
    #[error("{0}")]
    Provider(ProviderError),

    /// The reply parsed as JSON but lacked the fields the stage needs
    #[error("Reply shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Shape(message) => PipelineError::ShapeMismatch(message),
            other => PipelineError::Provider(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
