//! Token-budgeted text chunking
//!
//! Splits long transcripts into overlapping, boundary-aware sub-chunks and packs
//! them into working chunks sized for a single oracle call.

pub mod chunk;
pub mod error;
pub mod planner;
pub mod splitter;
pub mod tokenizer;

pub use chunk::{coalesce, WorkingChunk};
pub use error::{ChunkingError, ChunkingResult};
pub use planner::{
    split, ChunkPlanner, ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_TOKENS,
    DEFAULT_WORKING_TOKENS,
};
pub use splitter::{RecursiveSplitter, DEFAULT_SEPARATORS};
pub use tokenizer::{HeuristicEstimator, TiktokenEstimator, TokenEstimator};
