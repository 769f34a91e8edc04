use thiserror::Error;

pub type ChunkingResult<T> = Result<T, ChunkingError>;

#[derive(Debug, Error)]
pub enum ChunkingError {
    #[error("Tokenizer unavailable: {0}")]
    Tokenizer(String),

    #[error("Invalid chunking configuration: {0}")]
    InvalidConfig(String),
}
