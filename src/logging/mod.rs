//! The test-process logging pipeline forwarded records end up in.

mod directive;

pub use directive::{InitializationError, LogDirective};

use crate::config::ScopeConfig;
use crate::domain::LogLevel;
use parking_lot::RwLock;
use std::sync::OnceLock;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub struct LoggingSystem {
    directives: RwLock<Vec<LogDirective>>,
    default_level: LogLevel,
}

impl LoggingSystem {
    pub fn new() -> Self {
        Self {
            directives: RwLock::new(Vec::new()),
            default_level: LogLevel::Information,
        }
    }

    pub fn from_config(config: &ScopeConfig) -> Result<Self, InitializationError> {
        let system = Self {
            directives: RwLock::new(Vec::new()),
            default_level: config.log_level,
        };
        for directive in &config.directives {
            system.add_directive(directive)?;
        }
        Ok(system)
    }

    pub fn add_directive(&self, directive_str: &str) -> Result<(), InitializationError> {
        let directive = LogDirective::parse(directive_str)?;
        self.directives.write().push(directive);
        Ok(())
    }

    pub fn build_filter_string(&self, default_level: LogLevel) -> String {
        let directives = self.directives.read();

        let mut filter_parts = Vec::with_capacity(directives.len() + 1);
        filter_parts.push(default_level.as_filter_str().to_string());
        for directive in directives.iter() {
            filter_parts.push(directive.to_filter_string());
        }

        filter_parts.join(",")
    }

    pub fn build_filter(&self, default_level: LogLevel) -> Result<EnvFilter, InitializationError> {
        let filter_string = self.build_filter_string(default_level);
        EnvFilter::try_new(&filter_string).map_err(|e| InitializationError::LoggingInitFailed {
            details: format!("Failed to create EnvFilter with '{filter_string}'"),
            source: Box::new(e),
        })
    }

    /// Install the pipeline as this thread's default subscriber.
    ///
    /// Output goes through the libtest writer so it is captured per test.
    /// The returned guard can be handed to a scope as its wrapped resource.
    pub fn init_thread_default(&self) -> Result<DefaultGuard, InitializationError> {
        let subscriber = tracing_subscriber::registry()
            .with(self.build_filter(self.default_level)?)
            .with(test_fmt_layer());
        Ok(tracing::subscriber::set_default(subscriber))
    }

    /// Install the pipeline process-wide. Later calls report the outcome of the first.
    pub fn init_global(&self) -> Result<(), InitializationError> {
        static INIT: OnceLock<Result<(), String>> = OnceLock::new();

        let outcome = INIT.get_or_init(|| {
            let filter = self.build_filter(self.default_level).map_err(|e| e.to_string())?;
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(test_fmt_layer());
            tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
        });

        outcome
            .clone()
            .map_err(|details| InitializationError::LoggingInitFailed {
                details: "Failed to set global tracing subscriber".to_string(),
                source: details.into(),
            })
    }

    pub fn directive_count(&self) -> usize {
        self.directives.read().len()
    }
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn test_fmt_layer<S>() -> impl tracing_subscriber::Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_test_writer()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(false)
        .compact()
}

/// Build the test pipeline from `config` and install it for the current thread.
pub fn setup_test_logging(config: &ScopeConfig) -> Result<DefaultGuard, InitializationError> {
    LoggingSystem::from_config(config)?.init_thread_default()
}
