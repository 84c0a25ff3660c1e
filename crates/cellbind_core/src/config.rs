//! Core configuration.
//!
//! # Responsibility
//! - Describe logging and registry settings in one serde-backed structure.
//! - Load settings from JSON and reject values the core can not honor.
//!
//! # Invariants
//! - Every field has a default, so `{}` is a valid configuration.
//! - The registry is bounded unless `max_entries` is explicitly `null`.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default registry capacity.
pub const DEFAULT_MAX_ENTRIES: usize = 65_536;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute log directory; logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Object registry retention settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Capacity; the oldest entry is evicted when a registration would
    /// exceed it. `None` means unbounded.
    pub max_entries: Option<usize>,
    /// Entries older than this are evicted on the next registration.
    pub max_age_secs: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(DEFAULT_MAX_ENTRIES),
            max_age_secs: None,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(
            self.logging.level.trim().to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "warning" | "error"
        ) {
            return Err(ConfigError::Invalid(format!(
                "logging.level `{}` is unsupported",
                self.logging.level
            )));
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.registry.max_entries == Some(0) {
            return Err(ConfigError::Invalid(
                "registry.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration load errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(message) => write!(f, "failed to read config: {message}"),
            Self::Parse(message) => write!(f, "failed to parse config: {message}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_MAX_ENTRIES};

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").expect("empty config");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.registry.max_entries, Some(DEFAULT_MAX_ENTRIES));
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn explicit_null_capacity_means_unbounded() {
        let config = CoreConfig::from_json_str(r#"{"registry": {"max_entries": null}}"#)
            .expect("null capacity");
        assert_eq!(config.registry.max_entries, None);
    }

    #[test]
    fn rejects_zero_capacity_and_relative_dir() {
        let err = CoreConfig::from_json_str(r#"{"registry": {"max_entries": 0}}"#)
            .expect_err("zero capacity");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_json_str(r#"{"logging": {"dir": "logs"}}"#)
            .expect_err("relative dir");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = CoreConfig::from_json_str(r#"{"registy": {}}"#).expect_err("typo");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
