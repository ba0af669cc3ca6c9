//! Application configuration

use anyhow::Result;
use headcount_types::{DisplayConfig, FeedConfig, PipelineConfig, SchemaError, TimeFormatError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current configuration format version
pub const CONFIG_VERSION: u32 = 1;

/// Configuration values that cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("display_limit must be at least 1")]
    DisplayLimit,
    #[error("grid needs at least one column")]
    GridColumns,
    #[error("poll_interval_ms must be at least 1")]
    PollInterval,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    TimeFormat(#[from] TimeFormatError),
}

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "headcount", "headcount")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values the types alone cannot rule out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.display_limit == 0 {
            return Err(ConfigError::DisplayLimit);
        }
        if self.display.grid.columns == 0 {
            return Err(ConfigError::GridColumns);
        }
        if self.feed.poll_interval_ms == 0 {
            return Err(ConfigError::PollInterval);
        }
        self.pipeline.metrics.validate()?;
        self.pipeline.time_format.formatter()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            feed: FeedConfig::default(),
            pipeline: PipelineConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}
