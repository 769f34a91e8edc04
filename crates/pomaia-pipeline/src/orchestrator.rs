//! Pipeline orchestrator
//!
//! Owns the source text, the cumulative result and the in-flight guard. Exactly
//! one operation runs at a time; calls made while one is running return
//! `Ok(())` straight away without touching any state.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use pomaia_chunking::{ChunkPlanner, ChunkingConfig};
use pomaia_providers::{Provider, StructuredCaller};
use pomaia_storage::KeyValueStore;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, error, info};

use crate::{
    config::AppConfig,
    error::Result,
    highlights::{HighlightExtractor, StageContext},
    models::PipelineResult,
    notifications::{NotificationCenter, PipelineEvent},
    store::ResultStore,
    summary::SummarySynthesizer,
};

/// Cheaply cloneable handle to one pipeline instance
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    highlights: HighlightExtractor,
    summary: SummarySynthesizer,
    ctx: StageContext,
    source_text: RwLock<String>,
    processing: AtomicBool,
    error: RwLock<Option<String>>,
}

/// Clears the in-flight flag when the running operation ends, however it ends
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct PipelineBuilder {
    caller: StructuredCaller,
    store: ResultStore,
    chunking: ChunkingConfig,
    planner: Option<ChunkPlanner>,
    max_concurrency: Option<usize>,
    notifications: Option<Arc<NotificationCenter>>,
}

impl PipelineBuilder {
    /// Budgets for the default (BPE-estimating) planner
    pub fn chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    /// Use a prepared planner instead of building one from the chunking budgets
    pub fn planner(mut self, planner: ChunkPlanner) -> Self {
        self.planner = Some(planner);
        self
    }

    pub fn max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn notifications(mut self, notifications: Arc<NotificationCenter>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Build a pipeline with empty state
    pub fn build(self) -> Result<Pipeline> {
        let planner = match self.planner {
            Some(planner) => planner,
            None => ChunkPlanner::with_tiktoken(self.chunking)?,
        };

        let ctx = StageContext {
            results: Arc::new(Mutex::new(PipelineResult::empty())),
            store: self.store,
            notifications: self.notifications.unwrap_or_default(),
        };

        Ok(Pipeline {
            inner: Arc::new(PipelineInner {
                highlights: HighlightExtractor::new(self.caller.clone(), Arc::new(planner))
                    .with_max_concurrency(self.max_concurrency),
                summary: SummarySynthesizer::new(self.caller),
                ctx,
                source_text: RwLock::new(String::new()),
                processing: AtomicBool::new(false),
                error: RwLock::new(None),
            }),
        })
    }

    /// Build a pipeline and restore source text and results from the store
    pub async fn hydrate(self) -> Result<Pipeline> {
        let pipeline = self.build()?;
        let ctx = &pipeline.inner.ctx;

        let source_text = ctx.store.load_source_text().await?;
        let results = ctx
            .store
            .load_results()
            .await?
            .map(PipelineResult::settle_interrupted)
            .unwrap_or_default();

        debug!(
            source_bytes = source_text.len(),
            quotes = results.quotes.data.len(),
            "Hydrated pipeline state"
        );

        *pipeline.inner.source_text.write().await = source_text;
        *ctx.results.lock().await = results;

        Ok(pipeline)
    }
}

impl Pipeline {
    pub fn builder(caller: StructuredCaller, store: ResultStore) -> PipelineBuilder {
        PipelineBuilder {
            caller,
            store,
            chunking: ChunkingConfig::default(),
            planner: None,
            max_concurrency: None,
            notifications: None,
        }
    }

    /// Pipeline over `provider` and `store` configured from `config`, hydrated
    pub async fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Pipeline> {
        config.validate()?;
        let caller = StructuredCaller::new(provider, config.oracle.model.clone())
            .with_temperature(config.oracle.temperature);

        Self::builder(caller, ResultStore::new(store))
            .chunking(config.pipeline.chunking())
            .max_concurrency(config.pipeline.max_concurrency)
            .hydrate()
            .await
    }

    /// Full run: store `text`, reset all results, extract highlights, then summarize them
    pub async fn process_text(&self, text: &str) -> Result<()> {
        let Some(_busy) = self.try_begin() else {
            debug!("Pipeline busy, ignoring process_text");
            return Ok(());
        };

        self.track("Processing", async {
            let inner = &self.inner;

            *inner.source_text.write().await = text.to_string();
            inner.ctx.store.save_source_text(text).await?;
            inner
                .ctx
                .update(|results| *results = PipelineResult::empty())
                .await?;

            let quotes = inner.highlights.extract(text, &inner.ctx).await?;
            let suggestions: Vec<String> = quotes.into_iter().map(|q| q.suggestion).collect();
            inner.summary.synthesize(&suggestions, &inner.ctx).await?;
            Ok(())
        })
        .await
    }

    /// Re-extract highlights from the stored source text; the summary is untouched
    pub async fn regenerate_highlights(&self) -> Result<()> {
        let Some(_busy) = self.try_begin() else {
            debug!("Pipeline busy, ignoring regenerate_highlights");
            return Ok(());
        };

        self.track("Highlight regeneration", async {
            let inner = &self.inner;
            let text = inner.source_text.read().await.clone();
            inner.highlights.extract(&text, &inner.ctx).await?;
            Ok(())
        })
        .await
    }

    /// Re-synthesize the summary from the stored highlights; highlights are untouched
    pub async fn regenerate_summary(&self) -> Result<()> {
        let Some(_busy) = self.try_begin() else {
            debug!("Pipeline busy, ignoring regenerate_summary");
            return Ok(());
        };

        self.track("Summary regeneration", async {
            let inner = &self.inner;
            let suggestions = inner.ctx.results.lock().await.quotes.suggestions();
            inner.summary.synthesize(&suggestions, &inner.ctx).await?;
            Ok(())
        })
        .await
    }

    /// Forget the source text and all results, in memory and in the store
    pub async fn clear(&self) -> Result<()> {
        let Some(_busy) = self.try_begin() else {
            debug!("Pipeline busy, ignoring clear");
            return Ok(());
        };

        let inner = &self.inner;
        inner.source_text.write().await.clear();
        *inner.ctx.results.lock().await = PipelineResult::empty();
        *inner.error.write().await = None;
        inner.ctx.store.clear().await
    }

    pub async fn source_text(&self) -> String {
        self.inner.source_text.read().await.clone()
    }

    /// Snapshot of the cumulative result
    pub async fn results(&self) -> PipelineResult {
        self.inner.ctx.results.lock().await.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.inner.processing.load(Ordering::Acquire)
    }

    /// Message of the last failed operation, cleared when a new one starts
    pub async fn error(&self) -> Option<String> {
        self.inner.error.read().await.clone()
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.inner.ctx.notifications
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.inner.ctx.notifications.subscribe()
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.inner
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                flag: &self.inner.processing,
            })
    }

    async fn track<F>(&self, operation: &str, work: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        *self.inner.error.write().await = None;

        match work.await {
            Ok(()) => {
                info!("{} finished", operation);
                self.inner
                    .ctx
                    .notifications
                    .notify(format!("{} finished", operation));
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, "{} failed", operation);
                *self.inner.error.write().await = Some(message.clone());
                self.inner
                    .ctx
                    .notifications
                    .notify(format!("{} failed: {}", operation, message));
                Err(e)
            }
        }
    }
}
