//! Client configuration, loaded from TOML.
//!
//! ```toml
//! zoom_step = 1.1
//! entity_ttl_secs = 30.0   # omit to keep entities forever
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use starwatch_core::constants::{DEFAULT_ZOOM_STEP, MICROS_PER_SEC};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Zoom factor per wheel notch. Must be greater than 1.
    pub zoom_step: f64,
    /// Evict entities not updated for this many seconds of server time.
    /// `None` keeps every entity for the whole session.
    pub entity_ttl_secs: Option<f64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            zoom_step: DEFAULT_ZOOM_STEP,
            entity_ttl_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load and validate a TOML config file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if let Some(ttl) = self.entity_ttl_secs {
            if !ttl.is_finite() || ttl <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "entity_ttl_secs must be positive, got {ttl}"
                )));
            }
        }
        Ok(())
    }

    /// Entity time-to-live in microseconds, if expiry is enabled.
    pub fn entity_ttl_us(&self) -> Option<u64> {
        self.entity_ttl_secs
            .map(|secs| (secs * MICROS_PER_SEC).round() as u64)
    }
}
