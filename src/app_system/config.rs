use std::path::Path;
use std::time::Duration;

use chrono::FixedOffset;
use serde::Deserialize;
use thiserror::Error;

use crate::promoter::{DEFAULT_INTERVAL, DEFAULT_PAGE_SIZE};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.message().to_string())
    }
}

/// Top-level configuration. Every section and field is optional.
///
/// ```toml
/// [sequence]
/// prefix = "ORD"
/// utc_offset_minutes = 0
///
/// [promoter]
/// enabled = true
/// interval_seconds = 300
/// page_size = 50
///
/// [store]
/// buffer_size = 32
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sequence: SequenceConfig,
    pub promoter: PromoterConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceConfig {
    pub prefix: String,
    /// Offset of the reference timezone that decides when a day rolls over.
    pub utc_offset_minutes: i32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            prefix: "ORD".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl SequenceConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        if !(-1439..=1439).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::Validation(format!(
                "sequence.utc_offset_minutes must be within -1439..=1439, got {}",
                self.utc_offset_minutes
            )));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Validation(format!("invalid UTC offset: {} minutes", self.utc_offset_minutes))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromoterConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
    pub page_size: usize,
}

impl Default for PromoterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: DEFAULT_INTERVAL.as_secs(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PromoterConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Capacity of the store actor's request channel.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence.prefix.trim().is_empty() {
            return Err(ConfigError::Validation("sequence.prefix cannot be empty".into()));
        }
        self.sequence.offset()?;
        if self.promoter.interval_seconds == 0 {
            return Err(ConfigError::Validation("promoter.interval_seconds must be at least 1".into()));
        }
        if self.promoter.page_size == 0 {
            return Err(ConfigError::Validation("promoter.page_size must be at least 1".into()));
        }
        if self.store.buffer_size == 0 {
            return Err(ConfigError::Validation("store.buffer_size must be at least 1".into()));
        }
        Ok(())
    }
}
