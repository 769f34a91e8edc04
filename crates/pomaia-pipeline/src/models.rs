//! Pipeline data model
//!
//! The persisted layout is camelCase (`quotes.data`, `quotes.tokensUsed`,
//! `summary.titles`, ...). Each artifact additionally carries an explicit
//! [`ArtifactState`]; documents written without it get one derived from
//! `tokensUsed`, so a zero-token artifact reads as never run.

use serde::{Deserialize, Serialize};

/// Lifecycle of one derived artifact (highlights or summary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactState {
    #[default]
    NotRun,
    Running,
    Completed,
    Failed,
}

impl ArtifactState {
    fn from_tokens(tokens_used: u64) -> Self {
        if tokens_used == 0 {
            ArtifactState::NotRun
        } else {
            ArtifactState::Completed
        }
    }
}

/// One extracted insight: the quote as spoken and a grammatically fixed version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub original: String,
    pub suggestion: String,
}

impl QuoteRecord {
    pub fn new(original: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "HighlightDocument")]
pub struct HighlightResult {
    pub data: Vec<QuoteRecord>,
    pub tokens_used: u64,
    pub state: ArtifactState,
}

impl Default for HighlightResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl HighlightResult {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            tokens_used: 0,
            state: ArtifactState::NotRun,
        }
    }

    /// Empty result marked as in progress
    pub fn running() -> Self {
        Self {
            state: ArtifactState::Running,
            ..Self::empty()
        }
    }

    /// Append one chunk's quotes and add its token usage
    pub fn merge(&mut self, quotes: Vec<QuoteRecord>, tokens_used: u64) {
        self.data.extend(quotes);
        self.tokens_used += tokens_used;
    }

    pub fn has_output(&self) -> bool {
        self.state == ArtifactState::Completed || self.tokens_used != 0
    }

    /// The grammatically fixed quote texts, in stored order
    pub fn suggestions(&self) -> Vec<String> {
        self.data.iter().map(|q| q.suggestion.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SummaryDocument")]
pub struct SummaryResult {
    pub titles: Vec<String>,
    pub summary: String,
    pub topics: Vec<String>,
    pub tokens_used: u64,
    pub state: ArtifactState,
}

impl Default for SummaryResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl SummaryResult {
    pub fn empty() -> Self {
        Self {
            titles: Vec::new(),
            summary: String::new(),
            topics: Vec::new(),
            tokens_used: 0,
            state: ArtifactState::NotRun,
        }
    }

    pub fn running() -> Self {
        Self {
            state: ArtifactState::Running,
            ..Self::empty()
        }
    }

    /// Completed summary built from an oracle reply
    pub fn completed(reply: SummaryReply, tokens_used: u64) -> Self {
        Self {
            titles: reply.titles,
            summary: reply.summary,
            topics: reply.topics,
            tokens_used,
            state: ArtifactState::Completed,
        }
    }

    pub fn has_output(&self) -> bool {
        self.state == ArtifactState::Completed || self.tokens_used != 0
    }
}

/// Root persisted artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub quotes: HighlightResult,
    pub summary: SummaryResult,
}

impl PipelineResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether anything is worth persisting
    pub fn has_output(&self) -> bool {
        self.quotes.has_output() || self.summary.has_output()
    }

    /// An artifact left `Running` by an interrupted process is reported as failed
    pub(crate) fn settle_interrupted(mut self) -> Self {
        if self.quotes.state == ArtifactState::Running {
            self.quotes.state = ArtifactState::Failed;
        }
        if self.summary.state == ArtifactState::Running {
            self.summary.state = ArtifactState::Failed;
        }
        self
    }
}

/// Expected reply of a pull-quotes call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HighlightReply {
    pub quotes: Vec<QuoteRecord>,
}

/// Expected reply of a summary call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryReply {
    pub titles: Vec<String>,
    pub topics: Vec<String>,
    pub summary: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighlightDocument {
    #[serde(default)]
    data: Vec<QuoteRecord>,
    #[serde(default)]
    tokens_used: u64,
    #[serde(default)]
    state: Option<ArtifactState>,
}

impl From<HighlightDocument> for HighlightResult {
    fn from(doc: HighlightDocument) -> Self {
        Self {
            state: doc
                .state
                .unwrap_or_else(|| ArtifactState::from_tokens(doc.tokens_used)),
            data: doc.data,
            tokens_used: doc.tokens_used,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDocument {
    #[serde(default)]
    titles: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    tokens_used: u64,
    #[serde(default)]
    state: Option<ArtifactState>,
}

impl From<SummaryDocument> for SummaryResult {
    fn from(doc: SummaryDocument) -> Self {
        Self {
            state: doc
                .state
                .unwrap_or_else(|| ArtifactState::from_tokens(doc.tokens_used)),
            titles: doc.titles,
            summary: doc.summary,
            topics: doc.topics,
            tokens_used: doc.tokens_used,
        }
    }
}
