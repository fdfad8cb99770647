//! Destination loggers that forwarded records are written into.

mod tracing_logger;

pub use tracing_logger::{FORWARDED_TARGET, TracingLogger, TracingLoggerFactory};

use crate::domain::{
    EventId, Formatter, LogError, LogLevel, LogState, ScopeError, default_formatter,
};
use std::sync::Arc;

/// A named destination logger.
pub trait Logger: Send + Sync {
    fn name(&self) -> &str;

    /// Write one record. The arguments are passed through untouched by the
    /// scope; rendering is the sink's business.
    fn log(
        &self,
        level: LogLevel,
        event_id: &EventId,
        state: &LogState,
        error: Option<&LogError>,
        formatter: &Formatter,
    ) -> Result<(), ScopeError>;

    fn log_message(&self, level: LogLevel, message: &str) -> Result<(), ScopeError> {
        let state: LogState = Arc::new(message.to_string());
        self.log(level, &EventId::default(), &state, None, &default_formatter())
    }

    fn log_information(&self, message: &str) -> Result<(), ScopeError> {
        self.log_message(LogLevel::Information, message)
    }

    fn log_warning(&self, message: &str) -> Result<(), ScopeError> {
        self.log_message(LogLevel::Warning, message)
    }
}

/// Produces named destination loggers.
///
/// Implementations are not required to tolerate concurrent creation of
/// loggers with the same name; callers serialize that themselves.
pub trait LoggerFactory: Send + Sync {
    fn create_logger(&self, name: &str) -> Result<Arc<dyn Logger>, ScopeError>;
}
