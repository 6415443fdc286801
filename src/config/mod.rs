//! Configuration module for unicorn-paradise
//!
//! A single TOML document with one table per concern. Every section uses
//! `#[serde(default)]`, so a file only needs the keys it overrides.

pub mod sections;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sections::{AudioConfig, FormConfig, Platform, PlaybackConfig, UiConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub form: FormConfig,
    pub playback: PlaybackConfig,
    pub audio: AudioConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing keys use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.playback.pass_duration_ms == 0 {
            return Err(ConfigError::Invalid("playback.pass_duration_ms must be positive".to_owned()));
        }
        if self.ui.viewport_width == 0 || self.ui.viewport_height == 0 {
            return Err(ConfigError::Invalid("ui viewport must not be empty".to_owned()));
        }
        Ok(())
    }
}
