//! Highlight extraction stage
//!
//! Fans one pull-quotes call out per working chunk and merges each reply into the
//! shared result as soon as it arrives. A failing chunk does not stop its
//! siblings; their merges stand and the stage reports the first error once every
//! call has finished.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use pomaia_chunking::ChunkPlanner;
use pomaia_providers::StructuredCaller;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{PipelineError, Result},
    models::{ArtifactState, HighlightReply, HighlightResult, PipelineResult, QuoteRecord},
    notifications::{NotificationCenter, PipelineEvent, Stage},
    prompts::PULL_QUOTES_PROMPT,
    store::ResultStore,
};

/// State the stages mutate: the cumulative result and its persisted mirror
pub struct StageContext {
    pub results: Arc<Mutex<PipelineResult>>,
    pub store: ResultStore,
    pub notifications: Arc<NotificationCenter>,
}

impl StageContext {
    /// Apply `update` under the lock and mirror the new state into the store.
    ///
    /// The in-memory change always stands; only the mirror write can fail.
    pub(crate) async fn update<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(&mut PipelineResult),
    {
        let mut results = self.results.lock().await;
        update(&mut results);
        self.store.save_results(&results).await
    }

    /// Like [`update`](Self::update), for transitions made while an error is
    /// already being reported: a failed mirror write is logged, not returned.
    pub(crate) async fn settle<F>(&self, update: F)
    where
        F: FnOnce(&mut PipelineResult),
    {
        if let Err(e) = self.update(update).await {
            warn!(error = %e, "Failed to persist pipeline state");
        }
    }
}

pub struct HighlightExtractor {
    caller: StructuredCaller,
    planner: Arc<ChunkPlanner>,
    max_concurrency: Option<usize>,
}

impl HighlightExtractor {
    pub fn new(caller: StructuredCaller, planner: Arc<ChunkPlanner>) -> Self {
        Self {
            caller,
            planner,
            max_concurrency: None,
        }
    }

    /// Cap in-flight oracle calls; `None` issues every chunk at once
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Reset the highlight result, extract quotes from every working chunk of
    /// `text`, and return them in arrival order.
    ///
    /// Neither an oracle failure nor a store failure stops the calls already
    /// issued; the first error is returned once all of them have been merged.
    pub async fn extract(&self, text: &str, ctx: &StageContext) -> Result<Vec<QuoteRecord>> {
        if let Err(e) = ctx
            .update(|results| results.quotes = HighlightResult::running())
            .await
        {
            return Err(fail(e, ctx).await);
        }

        let chunks = self.planner.split(text);
        let total = chunks.len();
        let limit = self.max_concurrency.unwrap_or(total).max(1);

        info!(chunks = total, concurrency = limit, "Extracting highlights");
        ctx.notifications.publish(PipelineEvent::StageStarted {
            stage: Stage::Highlights,
            calls: total,
        });

        let caller = &self.caller;
        let mut replies = stream::iter(chunks.into_iter().enumerate().map(|(index, chunk)| async move {
            debug!(chunk = index, tokens = chunk.token_length, "Requesting pull quotes");
            let reply = caller
                .call::<HighlightReply>(PULL_QUOTES_PROMPT, &chunk.text)
                .await;
            (index, reply)
        }))
        .buffer_unordered(limit);

        let mut extracted = Vec::new();
        let mut first_error: Option<PipelineError> = None;
        let mut completed = 0usize;

        while let Some((index, reply)) = replies.next().await {
            completed += 1;
            match reply {
                Ok(reply) => {
                    let quotes = reply.result.quotes;
                    let count = quotes.len();
                    let tokens_used = reply.tokens_used;

                    if let Err(e) = ctx
                        .update(|results| results.quotes.merge(quotes.clone(), tokens_used))
                        .await
                    {
                        warn!(chunk = index, error = %e, "Merged chunk was not persisted");
                        first_error.get_or_insert(e);
                    }
                    extracted.extend(quotes);

                    debug!(chunk = index, quotes = count, tokens_used, "Merged chunk");
                    ctx.notifications.publish(PipelineEvent::ChunkMerged {
                        quotes: count,
                        tokens_used,
                        completed,
                        total,
                    });
                }
                Err(e) => {
                    warn!(chunk = index, error = %e, "Pull-quotes call failed");
                    first_error.get_or_insert(e.into());
                }
            }
        }

        if let Some(error) = first_error {
            return Err(fail(error, ctx).await);
        }

        let mut tokens_used = 0;
        if let Err(e) = ctx
            .update(|results| {
                results.quotes.state = ArtifactState::Completed;
                tokens_used = results.quotes.tokens_used;
            })
            .await
        {
            return Err(fail(e, ctx).await);
        }

        info!(quotes = extracted.len(), tokens_used, "Highlights extracted");
        ctx.notifications.publish(PipelineEvent::StageCompleted {
            stage: Stage::Highlights,
            tokens_used,
        });

        Ok(extracted)
    }
}

/// Mark the highlights failed (persisting it if the store allows) and hand `error` back
async fn fail(error: PipelineError, ctx: &StageContext) -> PipelineError {
    ctx.settle(|results| results.quotes.state = ArtifactState::Failed)
        .await;
    ctx.notifications.publish(PipelineEvent::StageFailed {
        stage: Stage::Highlights,
        error: error.to_string(),
    });
    error
}
