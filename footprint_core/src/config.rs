//! # Engine Configuration
//!
//! Startup settings for the engine, read from a TOML file. Every field has a
//! default, so an empty file (or no file) gives the standard behavior:
//! built-in factor tables, strict key lookups, and event recording for the
//! travel category only.
//!
//! ## TOML Example
//!
//! ```toml
//! # "error" (default) or { default = 0.0 }
//! on_unknown_key = { default = 0.0 }
//! record_categories = ["travel", "waste"]
//! event_log = "data/computed_events.jsonl"
//! factor_tables = "data/factors-2025.toml"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ConfigError, ConfigResult};
use crate::input::Category;

/// What a lookup does when the user's key is not in the factor table.
///
/// Applies to the waste age-group lookup. Every other category always
/// rejects unknown keys.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Reject the request with a validation error
    #[default]
    Error,
    /// Substitute this value and continue (the legacy behavior used 0)
    Default(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Policy for unknown waste age groups
    pub on_unknown_key: UnknownKeyPolicy,

    /// Categories whose calculators write computed events
    pub record_categories: Vec<Category>,

    /// Append-only event log; recording is disabled when unset
    pub event_log: Option<PathBuf>,

    /// Factor table override; the built-in tables are used when unset
    pub factor_tables: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            on_unknown_key: UnknownKeyPolicy::Error,
            record_categories: vec![Category::Travel],
            event_log: None,
            factor_tables: None,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(source).map_err(|e| ConfigError::ParseError {
            source_name: "engine config".to_string(),
            reason: e.to_string(),
        })?;
        if let UnknownKeyPolicy::Default(value) = config.on_unknown_key {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ParseError {
                    source_name: "engine config".to_string(),
                    reason: format!("on_unknown_key default must be a non-negative number, got {}", value),
                });
            }
        }
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        debug!("Loading engine config from {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            operation: "read".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Whether calculations in this category should reach the recorder
    pub fn records(&self, category: Category) -> bool {
        self.record_categories.contains(&category)
    }
}
