//! Oracle configuration management
//!
//! Handles loading and validating oracle configuration from:
//! 1. Environment variables (highest priority)
//! 2. Project config file (.pomaia/config.yaml)
//! 3. Global config file (~/.pomaia/config.yaml)
//! 4. Built-in defaults (lowest priority)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ProviderError;

/// Oracle connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of an OpenAI-compatible API (default: http://localhost:11434/v1)
    pub base_url: String,
    /// Model identifier (default: gemma2:9b)
    pub model: String,
    /// Optional bearer token; local servers usually need none
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 300, local generation is slow)
    pub timeout_secs: u64,
    /// Sampling temperature, server default when absent
    pub temperature: Option<f32>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "gemma2:9b".to_string(),
            api_key: None,
            timeout_secs: 300,
            temperature: None,
        }
    }
}

/// `oracle:` section of a config file; every field optional so files can be partial
#[derive(Debug, Default, Deserialize)]
struct OracleFileSection {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct OracleFileConfig {
    oracle: Option<OracleFileSection>,
}

impl OracleConfig {
    /// Load with precedence: defaults < global file < project file < environment
    pub fn load_with_precedence() -> Result<Self, ProviderError> {
        Self::load_from_paths(&default_config_paths())
    }

    /// Load from the given files (later files win), then the environment, then validate
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self, ProviderError> {
        let mut config = Self::default();

        for path in paths {
            if path.exists() {
                debug!("Loading oracle config from {:?}", path);
                config.merge_from_file(path)?;
            }
        }

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Overlay values from the `oracle:` section of a YAML file
    pub fn merge_from_file(&mut self, path: &Path) -> Result<(), ProviderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::ConfigError(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file_config: OracleFileConfig = serde_yaml::from_str(&content).map_err(|e| {
            ProviderError::ConfigError(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(oracle) = file_config.oracle {
            if let Some(base_url) = oracle.base_url {
                self.base_url = base_url;
            }
            if let Some(model) = oracle.model {
                self.model = model;
            }
            if oracle.api_key.is_some() {
                self.api_key = oracle.api_key;
            }
            if let Some(timeout_secs) = oracle.timeout_secs {
                self.timeout_secs = timeout_secs;
            }
            if oracle.temperature.is_some() {
                self.temperature = oracle.temperature;
            }
        }

        Ok(())
    }

    /// Environment variables override any existing configuration
    pub fn load_from_env(&mut self) {
        if let Ok(url) = std::env::var("POMAIA_ORACLE_BASE_URL") {
            debug!("Loading POMAIA_ORACLE_BASE_URL from environment: {}", url);
            self.base_url = url;
        }

        if let Ok(model) = std::env::var("POMAIA_ORACLE_MODEL") {
            debug!("Loading POMAIA_ORACLE_MODEL from environment: {}", model);
            self.model = model;
        }

        if let Ok(key) = std::env::var("POMAIA_ORACLE_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        if let Ok(timeout_str) = std::env::var("POMAIA_ORACLE_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.timeout_secs = timeout,
                Err(_) => warn!("Invalid POMAIA_ORACLE_TIMEOUT_SECS value: {}", timeout_str),
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.base_url.is_empty() {
            return Err(ProviderError::ConfigError(
                "oracle base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ProviderError::ConfigError(format!(
                "oracle base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }

        if self.model.is_empty() {
            return Err(ProviderError::ConfigError(
                "oracle model cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ProviderError::ConfigError(
                "oracle timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Global (~/.pomaia/config.yaml) then project (.pomaia/config.yaml) config paths
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".pomaia").join("config.yaml"));
    }
    paths.push(PathBuf::from(".pomaia").join("config.yaml"));
    paths
}
