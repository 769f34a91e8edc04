//! Two-level split: fine boundary-aware sub-chunks, then coalescing toward the
//! working budget.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    chunk::{coalesce, WorkingChunk},
    error::{ChunkingError, ChunkingResult},
    splitter::RecursiveSplitter,
    tokenizer::{TiktokenEstimator, TokenEstimator},
};

/// Sub-chunk budget; tiny on purpose so boundaries are as fine as possible before coalescing
pub const DEFAULT_CHUNK_TOKENS: usize = 10;
pub const DEFAULT_CHUNK_OVERLAP: usize = 1;
/// Roughly half of a small local model's context window
pub const DEFAULT_WORKING_TOKENS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_tokens: usize,
    pub chunk_overlap: usize,
    pub working_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_tokens: DEFAULT_CHUNK_TOKENS,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            working_tokens: DEFAULT_WORKING_TOKENS,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> ChunkingResult<()> {
        if self.chunk_tokens == 0 {
            return Err(ChunkingError::InvalidConfig(
                "chunk_tokens must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_tokens {
            return Err(ChunkingError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_tokens ({})",
                self.chunk_overlap, self.chunk_tokens
            )));
        }
        if self.working_tokens == 0 {
            return Err(ChunkingError::InvalidConfig(
                "working_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Turns raw text into the working chunks the oracle is called on
pub struct ChunkPlanner {
    splitter: RecursiveSplitter,
    working_tokens: usize,
}

impl ChunkPlanner {
    pub fn new(config: ChunkingConfig, estimator: Arc<dyn TokenEstimator>) -> ChunkingResult<Self> {
        config.validate()?;
        Ok(Self {
            splitter: RecursiveSplitter::new(config.chunk_tokens, config.chunk_overlap, estimator)?,
            working_tokens: config.working_tokens,
        })
    }

    /// Planner backed by the `r50k_base` BPE estimator
    pub fn with_tiktoken(config: ChunkingConfig) -> ChunkingResult<Self> {
        Self::new(config, Arc::new(TiktokenEstimator::new()?))
    }

    pub fn working_tokens(&self) -> usize {
        self.working_tokens
    }

    pub fn split(&self, text: &str) -> Vec<WorkingChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let estimator = self.splitter.estimator().clone();
        let sub_chunks: Vec<WorkingChunk> = self
            .splitter
            .split_text(text)
            .into_iter()
            .map(|piece| {
                let token_length = estimator.estimate(&piece);
                WorkingChunk::new(piece, token_length)
            })
            .collect();

        let sub_chunk_count = sub_chunks.len();
        let working = coalesce(sub_chunks, self.working_tokens);

        debug!(
            input_bytes = text.len(),
            sub_chunks = sub_chunk_count,
            working_chunks = working.len(),
            "Planned working chunks"
        );

        working
    }
}

/// `split(text, chunkTokenBudget, overlapTokens, workingTokenBudget)` with the BPE estimator
pub fn split(
    text: &str,
    chunk_tokens: usize,
    chunk_overlap: usize,
    working_tokens: usize,
) -> ChunkingResult<Vec<WorkingChunk>> {
    let planner = ChunkPlanner::with_tiktoken(ChunkingConfig {
        chunk_tokens,
        chunk_overlap,
        working_tokens,
    })?;
    Ok(planner.split(text))
}
