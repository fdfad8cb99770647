//! Forwarding server log records into the test's own logging pipeline.
//!
//! A `ServerLogScope` attaches one listener to a `LogSource` for its lifetime.
//! Each record with a write payload is re-emitted on a destination logger named
//! after the record's origin logger plus a prefix (`"SERVER Hub"` for origin
//! `"Hub"`). Destination loggers are created lazily, once per origin name.

use crate::config::ScopeConfig;
use crate::domain::{LogRecord, ScopeError};
use crate::sink::{Logger, LoggerFactory};
use crate::source::{Listener, ListenerId, LogSource};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

const SCOPE_STARTED: &str = "Server log scope started.";
const SCOPE_STOPPED: &str = "Server log scope stopped.";
const NO_DATA: &str = "Server log has no data.";

/// A resource whose lifetime is tied to a scope and released on teardown.
///
/// Resources must be `Send` so a scope can be moved to another thread or task.
/// Thread-bound values such as `tracing::subscriber::DefaultGuard` stay with
/// the thread that created them, next to the scope rather than inside it.
pub trait WrappedResource: Send {
    fn release(self: Box<Self>) -> Result<(), ScopeError>;
}

/// Adapts a closure into a `WrappedResource`.
pub struct OnRelease<F>(pub F);

impl<F> WrappedResource for OnRelease<F>
where
    F: FnOnce() -> Result<(), ScopeError> + Send,
{
    fn release(self: Box<Self>) -> Result<(), ScopeError> {
        (self.0)()
    }
}

/// Origin name to destination logger. Append-only.
///
/// Lookups of known names only share the map's read lock. Creation is
/// serialized by a separate guard held across check-create-insert, so the
/// factory is never asked twice for the same name.
///
/// The guard is not reentrant. `create` must not synchronously emit into the
/// source that feeds this cache, or a record for another unseen origin would
/// deadlock on the guard.
#[derive(Default)]
pub struct LoggerCache {
    loggers: RwLock<HashMap<String, Arc<dyn Logger>>>,
    creation: Mutex<()>,
}

impl LoggerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create<F>(&self, name: &str, create: F) -> Result<Arc<dyn Logger>, ScopeError>
    where
        F: FnOnce() -> Result<Arc<dyn Logger>, ScopeError>,
    {
        if let Some(logger) = self.get(name) {
            return Ok(logger);
        }

        let _creation = self.creation.lock();
        if let Some(logger) = self.get(name) {
            return Ok(logger);
        }

        let logger = create()?;
        self.loggers
            .write()
            .insert(name.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Logger>> {
        self.loggers.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }
}

/// Everything the listener needs; shared between the scope and the source.
struct Forwarder {
    factory: Arc<dyn LoggerFactory>,
    cache: LoggerCache,
    scope_logger: Arc<dyn Logger>,
    config: ScopeConfig,
}

impl Forwarder {
    fn on_server_logged(&self, record: &LogRecord) -> Result<(), ScopeError> {
        let Some(write) = &record.write else {
            return self.scope_logger.log_warning(NO_DATA);
        };

        let logger = self.cache.get_or_create(&write.logger_name, || {
            self.factory
                .create_logger(&self.config.destination_name(&write.logger_name))
        })?;

        logger.log(
            write.level,
            &write.event_id,
            &write.state,
            write.error.as_ref(),
            &write.formatter,
        )
    }
}

/// Forwards server log records for as long as it is alive.
///
/// Call [`ServerLogScope::dispose`] to tear down and observe failures.
/// Dropping an undisposed scope runs the same teardown; a failure there is
/// reported on stderr because `Drop` cannot return it.
pub struct ServerLogScope {
    source: Arc<dyn LogSource>,
    forwarder: Arc<Forwarder>,
    listener: ListenerId,
    wrapped: Option<Box<dyn WrappedResource>>,
    disposed: bool,
}

impl ServerLogScope {
    pub fn new(
        source: Arc<dyn LogSource>,
        factory: Arc<dyn LoggerFactory>,
        wrapped: Option<Box<dyn WrappedResource>>,
    ) -> Result<Self, ScopeError> {
        Self::with_config(source, factory, wrapped, &ScopeConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn LogSource>,
        factory: Arc<dyn LoggerFactory>,
        wrapped: Option<Box<dyn WrappedResource>>,
        config: &ScopeConfig,
    ) -> Result<Self, ScopeError> {
        let scope_logger = factory.create_logger(&config.scope_logger_name)?;
        let forwarder = Arc::new(Forwarder {
            factory,
            cache: LoggerCache::new(),
            scope_logger,
            config: config.clone(),
        });

        forwarder.scope_logger.log_information(SCOPE_STARTED)?;

        // Subscribe last: a record may arrive as soon as the listener is registered.
        let target = Arc::clone(&forwarder);
        let listener: Listener =
            Arc::new(move |record: &LogRecord| target.on_server_logged(record));
        let listener = source.subscribe(listener);

        Ok(Self {
            source,
            forwarder,
            listener,
            wrapped,
            disposed: false,
        })
    }

    /// Unsubscribe, log the stop message, then release the wrapped resource.
    pub fn dispose(mut self) -> Result<(), ScopeError> {
        self.teardown()
    }

    pub fn listener_id(&self) -> ListenerId {
        self.listener
    }

    pub fn cached_logger_count(&self) -> usize {
        self.forwarder.cache.len()
    }

    /// Whether a destination logger exists for origin name `origin`.
    pub fn is_cached(&self, origin: &str) -> bool {
        self.forwarder.cache.get(origin).is_some()
    }

    fn teardown(&mut self) -> Result<(), ScopeError> {
        self.disposed = true;
        self.source.unsubscribe(self.listener);
        self.forwarder.scope_logger.log_information(SCOPE_STOPPED)?;
        if let Some(wrapped) = self.wrapped.take() {
            wrapped.release()?;
        }
        Ok(())
    }
}

impl WrappedResource for ServerLogScope {
    fn release(self: Box<Self>) -> Result<(), ScopeError> {
        (*self).dispose()
    }
}

impl Drop for ServerLogScope {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        if let Err(e) = self.teardown() {
            eprintln!("Warning: server log scope teardown failed: {e}");
        }
    }
}
