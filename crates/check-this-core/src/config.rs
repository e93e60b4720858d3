//! Configuration types for check-this.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::Severity;

/// Top-level configuration: per-rule toggles and severity overrides.
///
/// A rule without an entry runs at its default severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Per-rule configurations, keyed by rule id.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rules: HashMap<String, RuleConfig>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file.
    ///
    /// `.json` files are read as JSON, anything else as TOML. An empty or
    /// whitespace-only file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_toml(&content)
        }
    }

    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::Json)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Toml)
    }

    /// Checks if a rule is enabled. Defaults to true when unset.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }

    /// Applies `overrides` on top of this configuration, entry by entry.
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        let mut rules = self.rules.clone();
        rules.extend(overrides.rules.iter().map(|(k, v)| (k.clone(), *v)));
        Self { rules }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Invalid JSON configuration.
    #[error("Failed to parse config: {0}")]
    Json(#[source] serde_json::Error),

    /// Invalid TOML configuration.
    #[error("Failed to parse config: {0}")]
    Toml(#[source] toml::de::Error),
}
