#![allow(dead_code)]

pub mod capture;

use parking_lot::Mutex;
use server_log_scope::domain::{EventId, Formatter, LogError, LogLevel, LogState};
use server_log_scope::{Logger, LoggerFactory, ScopeError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One write observed by a `RecordingLogger`.
#[derive(Clone)]
pub struct Emission {
    pub logger: String,
    pub level: LogLevel,
    pub event_id: EventId,
    pub state: LogState,
    pub error: Option<LogError>,
    pub formatter: Formatter,
    pub message: String,
}

#[derive(Default)]
struct Journal {
    created: Mutex<Vec<String>>,
    emissions: Mutex<Vec<Emission>>,
    fail_writes: AtomicBool,
}

/// Logger factory that remembers every creation and every write.
#[derive(Clone, Default)]
pub struct RecordingLoggerFactory {
    journal: Arc<Journal>,
    creation_delay: Option<Duration>,
    fail_creation_of: Option<String>,
}

impl RecordingLoggerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep inside every creation to widen race windows.
    pub fn with_creation_delay(mut self, delay: Duration) -> Self {
        self.creation_delay = Some(delay);
        self
    }

    pub fn failing_creation_of(mut self, name: &str) -> Self {
        self.fail_creation_of = Some(name.to_string());
        self
    }

    pub fn fail_writes(&self, fail: bool) {
        self.journal.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<String> {
        self.journal.created.lock().clone()
    }

    pub fn creation_count(&self, name: &str) -> usize {
        self.journal
            .created
            .lock()
            .iter()
            .filter(|created| created.as_str() == name)
            .count()
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.journal.emissions.lock().clone()
    }

    pub fn emissions_on(&self, logger: &str) -> Vec<Emission> {
        self.emissions()
            .into_iter()
            .filter(|emission| emission.logger == logger)
            .collect()
    }

    pub fn server_emissions(&self) -> Vec<Emission> {
        self.emissions()
            .into_iter()
            .filter(|emission| emission.logger.starts_with("SERVER "))
            .collect()
    }

    pub fn messages_on(&self, logger: &str) -> Vec<String> {
        self.emissions_on(logger)
            .into_iter()
            .map(|emission| emission.message)
            .collect()
    }
}

impl LoggerFactory for RecordingLoggerFactory {
    fn create_logger(&self, name: &str) -> Result<Arc<dyn Logger>, ScopeError> {
        if self.fail_creation_of.as_deref() == Some(name) {
            return Err(ScopeError::logger_creation(name, "factory refused"));
        }
        if let Some(delay) = self.creation_delay {
            std::thread::sleep(delay);
        }
        self.journal.created.lock().push(name.to_string());
        Ok(Arc::new(RecordingLogger {
            name: name.to_string(),
            journal: Arc::clone(&self.journal),
        }))
    }
}

struct RecordingLogger {
    name: String,
    journal: Arc<Journal>,
}

impl Logger for RecordingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(
        &self,
        level: LogLevel,
        event_id: &EventId,
        state: &LogState,
        error: Option<&LogError>,
        formatter: &Formatter,
    ) -> Result<(), ScopeError> {
        if self.journal.fail_writes.load(Ordering::SeqCst) {
            return Err(ScopeError::sink(&self.name, "sink closed"));
        }
        self.journal.emissions.lock().push(Emission {
            logger: self.name.clone(),
            level,
            event_id: event_id.clone(),
            state: Arc::clone(state),
            error: error.cloned(),
            formatter: Arc::clone(formatter),
            message: formatter(state, error),
        });
        Ok(())
    }
}
