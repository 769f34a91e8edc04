//! Result store: the two persisted slots behind the pipeline

use std::sync::Arc;

use pomaia_storage::KeyValueStore;
use tracing::{debug, warn};

use crate::{error::Result, models::PipelineResult};

pub const SOURCE_TEXT_KEY: &str = "@PoMAIA/source-text";
pub const RESULTS_KEY: &str = "@PoMAIA/results";

/// Mirrors source text and results into a key/value store.
///
/// Both slots are absent rather than empty: the source slot when the text is
/// empty, the results slot when neither artifact has output.
#[derive(Clone)]
pub struct ResultStore {
    store: Arc<dyn KeyValueStore>,
}

impl ResultStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save_source_text(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            self.store.remove(SOURCE_TEXT_KEY).await?;
        } else {
            self.store.set(SOURCE_TEXT_KEY, text).await?;
        }
        Ok(())
    }

    /// Stored source text, empty when none
    pub async fn load_source_text(&self) -> Result<String> {
        Ok(self.store.get(SOURCE_TEXT_KEY).await?.unwrap_or_default())
    }

    pub async fn save_results(&self, results: &PipelineResult) -> Result<()> {
        if results.has_output() {
            let json = serde_json::to_string(results)?;
            self.store.set(RESULTS_KEY, &json).await?;
        } else if self.store.remove(RESULTS_KEY).await? {
            debug!("Removed empty results slot");
        }
        Ok(())
    }

    /// Stored results; an unreadable document is logged and treated as absent
    pub async fn load_results(&self) -> Result<Option<PipelineResult>> {
        let Some(raw) = self.store.get(RESULTS_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<PipelineResult>(&raw) {
            Ok(results) => Ok(Some(results)),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored results");
                Ok(None)
            }
        }
    }

    /// Remove both slots
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(SOURCE_TEXT_KEY).await?;
        self.store.remove(RESULTS_KEY).await?;
        Ok(())
    }
}
