mod env;
mod validation;

use crate::domain::LogLevel;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub use env::{
    ENV_LOG_DIRECTIVES, ENV_LOG_LEVEL, ENV_LOGGER_PREFIX, ENV_SCOPE_LOGGER_NAME,
};

/// Marker prepended to an origin logger name when forwarding.
pub const DEFAULT_LOGGER_PREFIX: &str = "SERVER ";

/// Name of the logger a scope reports its own lifecycle on.
pub const DEFAULT_SCOPE_LOGGER_NAME: &str = "ServerLogScope";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Settings shared by a log scope and the test logging pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub logger_prefix: String,
    pub scope_logger_name: String,
    pub log_level: LogLevel,
    /// `target=level` filter directives for the test pipeline.
    pub directives: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            logger_prefix: DEFAULT_LOGGER_PREFIX.to_string(),
            scope_logger_name: DEFAULT_SCOPE_LOGGER_NAME.to_string(),
            log_level: LogLevel::Information,
            directives: Vec::new(),
        }
    }
}

impl ScopeConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ScopeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ScopeConfig::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => ScopeConfig::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Display name of the destination logger for `origin`.
    pub fn destination_name(&self, origin: &str) -> String {
        format!("{}{origin}", self.logger_prefix)
    }
}
