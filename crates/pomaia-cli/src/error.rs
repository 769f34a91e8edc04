use pomaia_pipeline::PipelineError;
use pomaia_providers::ProviderError;
use pomaia_storage::StorageError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// User-facing message with a hint on what to do next
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'pomaia --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => format!(
                "Configuration error: {}\n\nCheck ~/.pomaia/config.yaml, .pomaia/config.yaml and POMAIA_* variables.",
                msg
            ),
            CliError::Oracle(msg) => format!(
                "Oracle error: {}\n\nIs the model server running? Try 'pomaia health'.",
                msg
            ),
            CliError::Pipeline(msg) => format!(
                "Processing failed: {}\n\nPartial results were kept; see 'pomaia show'.",
                msg
            ),
            CliError::Storage(msg) => format!(
                "Storage error: {}\n\nCheck that the data directory is writable.",
                msg
            ),
            CliError::Internal(msg) => format!("Internal error: {}\n\nPlease report this issue.", msg),
        }
    }

    /// Debug rendering for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

impl From<ProviderError> for CliError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ConfigError(msg) => CliError::Config(msg),
            other => CliError::Oracle(other.to_string()),
        }
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::Storage(err.to_string())
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Config(msg) => CliError::Config(msg),
            PipelineError::Provider(ProviderError::ConfigError(msg)) => CliError::Config(msg),
            PipelineError::Storage(e) => CliError::Storage(e.to_string()),
            other => CliError::Pipeline(other.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
