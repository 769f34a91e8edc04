//! Pipeline configuration
//!
//! The `pipeline:` section of the same YAML files the oracle settings live in,
//! layered the same way: defaults < global file < project file < environment.
//! Command line overrides are applied by the caller after loading.

use std::path::{Path, PathBuf};

use pomaia_chunking::{
    ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_TOKENS, DEFAULT_WORKING_TOKENS,
};
use pomaia_providers::{default_config_paths, OracleConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sub-chunk budget in tokens
    pub chunk_tokens: usize,
    /// Tokens of trailing context repeated at the start of the next sub-chunk
    pub chunk_overlap: usize,
    /// Working-chunk budget in tokens
    pub working_tokens: usize,
    /// Cap on in-flight oracle calls; `None` means one per working chunk
    pub max_concurrency: Option<usize>,
    /// Directory holding the persisted slots
    pub data_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_tokens: DEFAULT_CHUNK_TOKENS,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            working_tokens: DEFAULT_WORKING_TOKENS,
            max_concurrency: None,
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PipelineFileSection {
    chunk_tokens: Option<usize>,
    chunk_overlap: Option<usize>,
    working_tokens: Option<usize>,
    max_concurrency: Option<usize>,
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineFileConfig {
    pipeline: Option<PipelineFileSection>,
}

impl PipelineConfig {
    /// Budgets handed to the chunk planner
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig {
            chunk_tokens: self.chunk_tokens,
            chunk_overlap: self.chunk_overlap,
            working_tokens: self.working_tokens,
        }
    }

    /// Overlay values from the `pipeline:` section of a YAML file
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file_config: PipelineFileConfig = serde_yaml::from_str(&content).map_err(|e| {
            PipelineError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(section) = file_config.pipeline {
            if let Some(chunk_tokens) = section.chunk_tokens {
                self.chunk_tokens = chunk_tokens;
            }
            if let Some(chunk_overlap) = section.chunk_overlap {
                self.chunk_overlap = chunk_overlap;
            }
            if let Some(working_tokens) = section.working_tokens {
                self.working_tokens = working_tokens;
            }
            if section.max_concurrency.is_some() {
                self.max_concurrency = section.max_concurrency;
            }
            if let Some(data_dir) = section.data_dir {
                self.data_dir = data_dir;
            }
        }

        Ok(())
    }

    /// Environment variables override any existing configuration
    pub fn load_from_env(&mut self) {
        if let Some(value) = env_usize("POMAIA_CHUNK_TOKENS") {
            self.chunk_tokens = value;
        }
        if let Some(value) = env_usize("POMAIA_CHUNK_OVERLAP") {
            self.chunk_overlap = value;
        }
        if let Some(value) = env_usize("POMAIA_WORKING_TOKENS") {
            self.working_tokens = value;
        }
        if let Some(value) = env_usize("POMAIA_MAX_CONCURRENCY") {
            self.max_concurrency = Some(value);
        }
        if let Ok(dir) = std::env::var("POMAIA_DATA_DIR") {
            if !dir.is_empty() {
                debug!("Loading POMAIA_DATA_DIR from environment: {}", dir);
                self.data_dir = PathBuf::from(dir);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking()
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.max_concurrency == Some(0) {
            return Err(PipelineError::Config(
                "max_concurrency must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<usize>() {
        Ok(value) => {
            debug!("Loading {} from environment: {}", name, value);
            Some(value)
        }
        Err(_) => {
            warn!("Invalid {} value: {}", name, raw);
            None
        }
    }
}

/// `~/.pomaia/data`, or `.pomaia/data` when no home directory is known
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".pomaia").join("data"))
        .unwrap_or_else(|| PathBuf::from(".pomaia").join("data"))
}

/// Everything the application needs: oracle connection plus pipeline budgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load both sections from the default global and project config files
    pub fn load_with_precedence() -> Result<Self> {
        Self::load_from_paths(&default_config_paths())
    }

    /// Load from the given files (later files win), then the environment, then validate
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let oracle = OracleConfig::load_from_paths(paths)?;

        let mut pipeline = PipelineConfig::default();
        for path in paths {
            if path.exists() {
                debug!("Loading pipeline config from {:?}", path);
                pipeline.merge_from_file(path)?;
            }
        }
        pipeline.load_from_env();

        let config = Self { oracle, pipeline };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.oracle.validate()?;
        self.pipeline.validate()
    }
}
