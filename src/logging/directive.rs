use crate::domain::LogLevel;
use crate::domain::log_level::ParseLogLevelError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error(transparent)]
    InvalidLogLevel(#[from] ParseLogLevelError),

    #[error("Invalid directive format '{input}'. Expected: '{expected}'")]
    InvalidDirectiveFormat { input: String, expected: String },

    #[error("Empty target in directive '{input}'")]
    EmptyTarget { input: String },

    #[error("Logging system initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A `target=level` filter directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    pub target: String,
    pub level: LogLevel,
}

impl LogDirective {
    pub fn new(target: impl Into<String>, level: LogLevel) -> Self {
        Self {
            target: target.into(),
            level,
        }
    }

    pub fn parse(directive: &str) -> Result<Self, InitializationError> {
        let parts: Vec<&str> = directive.split('=').collect();

        if parts.len() != 2 {
            return Err(InitializationError::InvalidDirectiveFormat {
                input: directive.to_string(),
                expected: "target=level".to_string(),
            });
        }

        let target = parts[0].trim();
        if target.is_empty() {
            return Err(InitializationError::EmptyTarget {
                input: directive.to_string(),
            });
        }

        let level = LogLevel::from_str(parts[1])?;
        Ok(LogDirective::new(target, level))
    }

    /// String form accepted by `tracing_subscriber::EnvFilter`.
    pub fn to_filter_string(&self) -> String {
        format!("{}={}", self.target, self.level.as_filter_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directive_parsing_valid_cases() {
        let valid_cases = [
            ("hyper=warn", LogLevel::Warning),
            ("server_log_scope=debug", LogLevel::Debug),
            ("Hub=information", LogLevel::Information),
            (" tower = trace ", LogLevel::Trace),
            ("noisy=off", LogLevel::None),
        ];

        for (input, expected_level) in valid_cases {
            let directive = LogDirective::parse(input).unwrap();
            assert_eq!(directive.target, input.split('=').next().unwrap().trim());
            assert_eq!(directive.level, expected_level);
        }
    }

    #[test]
    fn test_log_directive_parsing_invalid_cases() {
        let invalid_cases = [
            ("", "empty string"),
            ("hyper", "missing level"),
            ("=warn", "empty target"),
            ("hyper=", "empty level"),
            ("hyper=loud", "invalid level"),
            ("hyper=warn=extra", "too many parts"),
        ];

        for (input, description) in invalid_cases {
            assert!(
                LogDirective::parse(input).is_err(),
                "Should fail for {description}: {input}"
            );
        }
    }

    #[test]
    fn test_parse_errors_by_kind() {
        let bad_level = LogDirective::parse("hyper=loud").unwrap_err();
        assert!(matches!(bad_level, InitializationError::InvalidLogLevel(_)));

        let bad_format = LogDirective::parse("hyper").unwrap_err();
        assert!(matches!(bad_format, InitializationError::InvalidDirectiveFormat { .. }));

        let empty_target = LogDirective::parse("=warn").unwrap_err();
        assert!(matches!(empty_target, InitializationError::EmptyTarget { .. }));
    }

    #[test]
    fn test_filter_string_uses_env_filter_names() {
        assert_eq!(
            LogDirective::new("Hub", LogLevel::Information).to_filter_string(),
            "Hub=info"
        );
        assert_eq!(
            LogDirective::new("Hub", LogLevel::Critical).to_filter_string(),
            "Hub=error"
        );
    }
}
