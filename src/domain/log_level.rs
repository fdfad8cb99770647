use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a server log record.
///
/// Variants are declared in ascending order so comparisons follow severity.
/// `None` sits above every real level and is never written by a sink.
/// Deserialization goes through `FromStr`, so config files and environment
/// variables accept the same names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Information,
    Warning,
    Error,
    Critical,
    None,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Invalid log level '{input}'. Valid levels: trace, debug, info, warn, error, critical, none"
)]
pub struct ParseLogLevelError {
    pub input: String,
}

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" | "information" => Ok(LogLevel::Information),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" | "fatal" => Ok(LogLevel::Critical),
            "none" | "off" => Ok(LogLevel::None),
            _ => Err(ParseLogLevelError {
                input: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLogLevelError;

    fn try_from(value: String) -> Result<Self, <LogLevel as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Information => "information",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::None => "none",
        }
    }

    /// Level name understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Information => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
            LogLevel::None => "off",
        }
    }
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Information,
            tracing::Level::WARN => LogLevel::Warning,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Information);
        assert!(LogLevel::Information < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert!(LogLevel::Critical < LogLevel::None);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Information);
        assert_eq!(LogLevel::from_str("Information").unwrap(), LogLevel::Information);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("critical").unwrap(), LogLevel::Critical);
        assert_eq!(LogLevel::from_str(" off ").unwrap(), LogLevel::None);

        let err = LogLevel::from_str("loud").unwrap_err();
        assert_eq!(err.input, "loud");
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(LogLevel::from(&tracing::Level::WARN), LogLevel::Warning);
        assert_eq!(LogLevel::from(&tracing::Level::TRACE), LogLevel::Trace);
    }

    #[test]
    fn test_filter_strings() {
        assert_eq!(LogLevel::Information.as_filter_str(), "info");
        assert_eq!(LogLevel::Critical.as_filter_str(), "error");
        assert_eq!(LogLevel::None.as_filter_str(), "off");
    }

    #[test]
    fn test_deserialize_accepts_short_names() {
        #[derive(Deserialize)]
        struct Holder {
            level: LogLevel,
        }

        let holder: Holder = toml::from_str("level = \"warn\"").unwrap();
        assert_eq!(holder.level, LogLevel::Warning);
        let holder: Holder = toml::from_str("level = \"information\"").unwrap();
        assert_eq!(holder.level, LogLevel::Information);
    }

    #[test]
    fn test_deserialize_matches_from_str() {
        #[derive(Deserialize)]
        struct Holder {
            level: LogLevel,
        }

        for name in ["off", "fatal", "INFO", " Warn "] {
            let holder: Holder = toml::from_str(&format!("level = \"{name}\"")).unwrap();
            assert_eq!(holder.level, LogLevel::from_str(name).unwrap());
        }
        assert!(toml::from_str::<Holder>("level = \"loud\"").is_err());
    }
}
