//! PoMAIA Providers - oracle abstraction for the highlight/summary pipeline
//!
//! This crate provides the request/response boundary to a text-generation oracle:
//! the [`Provider`] trait, an OpenAI-compatible HTTP implementation for locally
//! running models, reply sanitising, and structured (JSON) calls.

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod providers;
pub mod sanitize;
pub mod structured;

// Re-export commonly used types
pub use config::{default_config_paths, OracleConfig};
pub use error::ProviderError;
pub use models::{ChatCompletion, ChatRequest, Choice, ChoiceMessage, Message, Usage};
pub use provider::Provider;
pub use providers::OpenAiCompatProvider;
pub use sanitize::sanitize_reply;
pub use structured::{parse_reply, StructuredCaller, StructuredReply};
