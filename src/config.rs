//! Configuration file for the session shell
//!
//! All keys are optional:
//!
//! ```toml
//! quota_bytes = 5242880
//! notification_ms = 6000
//! log_level = "warn"
//! id_scheme = "uuid"   # or "sequential"
//! ```

use crate::ids::{AnyIds, SequentialIds, UuidGenerator};
use crate::notification::DEFAULT_DURATION;
use crate::storage::DEFAULT_QUOTA_BYTES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How new item ids are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdScheme {
    #[default]
    Uuid,
    Sequential,
}

/// Session shell settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Session storage allotment in bytes
    pub quota_bytes: usize,
    /// Auto-dismiss delay for notifications, in milliseconds
    pub notification_ms: u64,
    /// Default tracing filter, used when `RUST_LOG` is not set
    pub log_level: String,
    pub id_scheme: IdScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quota_bytes: DEFAULT_QUOTA_BYTES,
            notification_ms: DEFAULT_DURATION.as_millis() as u64,
            log_level: "warn".to_string(),
            id_scheme: IdScheme::Uuid,
        }
    }
}

impl Config {
    /// Read the configuration file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Build the id generator selected by `id_scheme`
    pub fn id_generator(&self) -> AnyIds {
        match self.id_scheme {
            IdScheme::Uuid => AnyIds::Uuid(UuidGenerator),
            IdScheme::Sequential => AnyIds::Sequential(SequentialIds::new()),
        }
    }
}
