use super::{ConfigError, ScopeConfig};
use crate::logging::LogDirective;

impl ScopeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scope_logger_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Scope logger name must not be empty".to_string(),
            ));
        }

        // An empty prefix is allowed: forwarded loggers then reuse the origin name.
        if self.logger_prefix.contains('\n') {
            return Err(ConfigError::InvalidConfig(
                "Logger prefix must be a single line".to_string(),
            ));
        }

        for directive in &self.directives {
            LogDirective::parse(directive).map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid directive '{directive}': {e}"))
            })?;
        }

        Ok(())
    }
}
