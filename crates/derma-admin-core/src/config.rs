//! Session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reducer::TransitionPolicy;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Options for a dashboard session. Every field has a default, so `{}` is a
/// valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Start from the seed collections instead of empty ones
    pub seed_data: bool,
    /// Whether prescription status changes must follow the transition table
    pub transition_policy: TransitionPolicy,
    /// Narrow list views by the captured filter criteria
    pub apply_filters: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_data: true,
            transition_policy: TransitionPolicy::Enforce,
            apply_filters: true,
        }
    }
}

impl SessionConfig {
    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
