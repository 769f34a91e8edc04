//! Token length estimation
//!
//! The splitter only needs a monotone-ish `text -> usize` function; exact counts
//! for the target model are not required.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tiktoken_rs::CoreBPE;

use crate::error::{ChunkingError, ChunkingResult};

/// Estimates how many tokens a piece of text occupies
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;
}

static R50K: OnceCell<Arc<CoreBPE>> = OnceCell::new();

/// BPE estimator backed by the GPT-2 (`r50k_base`) vocabulary
#[derive(Clone)]
pub struct TiktokenEstimator {
    bpe: Arc<CoreBPE>,
}

impl TiktokenEstimator {
    /// Load the shared `r50k_base` encoder (built once per process)
    pub fn new() -> ChunkingResult<Self> {
        let bpe = R50K
            .get_or_try_init(|| {
                tiktoken_rs::r50k_base()
                    .map(Arc::new)
                    .map_err(|e| ChunkingError::Tokenizer(e.to_string()))
            })?
            .clone();

        Ok(Self { bpe })
    }
}

impl TokenEstimator for TiktokenEstimator {
    fn estimate(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Roughly 1 token per 4 bytes; used where no BPE vocabulary is wanted
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }
}
