use super::{ConfigError, ScopeConfig};

pub const ENV_LOGGER_PREFIX: &str = "SERVER_LOG_PREFIX";
pub const ENV_SCOPE_LOGGER_NAME: &str = "SERVER_LOG_SCOPE_NAME";
pub const ENV_LOG_LEVEL: &str = "SERVER_LOG_LEVEL";
/// Comma-separated `target=level` list.
pub const ENV_LOG_DIRECTIVES: &str = "SERVER_LOG_DIRECTIVES";

/// Load and parse an environment variable. A missing variable keeps the current value.
fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}

impl ScopeConfig {
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        load_env_string(ENV_LOGGER_PREFIX, &mut self.logger_prefix);
        load_env_string(ENV_SCOPE_LOGGER_NAME, &mut self.scope_logger_name);
        load_env_var(ENV_LOG_LEVEL, &mut self.log_level)?;

        if let Ok(directives) = std::env::var(ENV_LOG_DIRECTIVES) {
            self.directives = directives
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        Ok(())
    }
}
