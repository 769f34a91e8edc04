//! PoMAIA Pipeline - pull quotes and a summary from long transcripts
//!
//! Splits a transcript into working chunks, extracts key quotes from every chunk
//! concurrently, then synthesizes titles, topics and a summary from those quotes.
//! Results accumulate incrementally and are mirrored into a persistent store so a
//! later session can pick them up, and either artifact can be regenerated without
//! recomputing the other.

pub mod config;
pub mod error;
pub mod highlights;
pub mod models;
pub mod notifications;
pub mod orchestrator;
pub mod prompts;
pub mod store;
pub mod summary;

pub use config::{default_data_dir, AppConfig, PipelineConfig};
pub use error::{PipelineError, Result};
pub use highlights::{HighlightExtractor, StageContext};
pub use models::{
    ArtifactState, HighlightReply, HighlightResult, PipelineResult, QuoteRecord, SummaryReply,
    SummaryResult,
};
pub use notifications::{
    Notification, NotificationCenter, NotificationId, PipelineEvent, Stage,
    DEFAULT_NOTIFICATION_TTL,
};
pub use orchestrator::{Pipeline, PipelineBuilder};
pub use store::{ResultStore, RESULTS_KEY, SOURCE_TEXT_KEY};
pub use summary::SummarySynthesizer;
