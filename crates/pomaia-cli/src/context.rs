//! Configuration and collaborators shared by every command

use std::{path::PathBuf, sync::Arc};

use pomaia_pipeline::{AppConfig, Pipeline, ResultStore};
use pomaia_providers::{default_config_paths, OpenAiCompatProvider, Provider};
use pomaia_storage::{FileStore, KeyValueStore};
use tracing::debug;

use crate::error::CliResult;

/// Command line overrides, applied on top of files and environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

pub struct AppContext {
    pub config: AppConfig,
}

impl AppContext {
    /// Load configuration with full precedence, then apply `overrides`
    pub fn load(overrides: &Overrides) -> CliResult<Self> {
        let mut paths = default_config_paths();
        if let Some(extra) = &overrides.config {
            paths.push(extra.clone());
        }

        let config = AppConfig::load_from_paths(&paths)?;
        Self::with_config(config, overrides)
    }

    /// Apply `overrides` to an already loaded configuration
    pub fn with_config(mut config: AppConfig, overrides: &Overrides) -> CliResult<Self> {
        if let Some(model) = &overrides.model {
            config.oracle.model = model.clone();
        }
        if let Some(base_url) = &overrides.base_url {
            config.oracle.base_url = base_url.clone();
        }
        if let Some(data_dir) = &overrides.data_dir {
            config.pipeline.data_dir = data_dir.clone();
        }
        config.validate()?;

        debug!(
            base_url = %config.oracle.base_url,
            model = %config.oracle.model,
            data_dir = ?config.pipeline.data_dir,
            "Configuration loaded"
        );
        Ok(Self { config })
    }

    pub fn provider(&self) -> CliResult<Arc<dyn Provider>> {
        let provider: Arc<dyn Provider> =
            Arc::new(OpenAiCompatProvider::from_config(&self.config.oracle)?);
        Ok(provider)
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::new(&self.config.pipeline.data_dir))
    }

    pub fn result_store(&self) -> ResultStore {
        ResultStore::new(self.store())
    }

    /// Pipeline over the configured oracle, hydrated from the data directory
    pub async fn pipeline(&self) -> CliResult<Pipeline> {
        Ok(Pipeline::from_config(&self.config, self.provider()?, self.store()).await?)
    }
}
