//! Assistant configuration
//!
//! Built once at startup from defaults, an optional TOML file, the
//! environment and CLI flags (in that order of precedence), then handed
//! to the executor and router by value. Nothing mutates it afterwards.

use crate::core::error::{AssistantError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the path of the `gcloud` executable
pub const GCLOUD_PATH_ENV: &str = "GCLOUD_PATH";

/// Environment variable holding the path of the `bq` executable
pub const BQ_PATH_ENV: &str = "BQ_PATH";

/// Environment variable enabling diagnostic trace output
pub const DEBUG_ENV: &str = "GCP_ASSISTANT_DEBUG";

/// Configuration for the command pipeline
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantConfig {
    /// Emit argument vectors, stdout and stderr of every invocation
    /// as debug events.
    ///
    /// Only read after startup; toggling it requires a new config.
    pub debug: bool,

    /// Filesystem path of the orchestration tool (`gcloud`)
    ///
    /// When unset the router passes an empty program name and the
    /// executor reports a launch failure.
    pub gcloud_path: Option<PathBuf>,

    /// Filesystem path of the query tool (`bq`)
    pub bq_path: Option<PathBuf>,
}

impl AssistantConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AssistantError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Create a config from environment variables only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto this config
    ///
    /// Reads GCLOUD_PATH, BQ_PATH and GCP_ASSISTANT_DEBUG. Variables
    /// that are unset or empty leave the current value untouched.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(path) = non_empty(GCLOUD_PATH_ENV) {
            self.gcloud_path = Some(PathBuf::from(path));
        }
        if let Some(path) = non_empty(BQ_PATH_ENV) {
            self.bq_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = non_empty(DEBUG_ENV) {
            self.debug = parse_flag(&flag);
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
