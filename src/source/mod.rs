//! Server-side log event sources.
//!
//! A `LogSource` is anything a scope can attach one listener to and detach it
//! from later. `ServerLogSource` is the in-process multicast used by test
//! servers, and `ServerLogLayer` feeds it from the server's tracing pipeline.

mod layer;

pub use layer::ServerLogLayer;

use crate::domain::{LogRecord, ScopeError};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback invoked for every server log notification.
pub type Listener = Arc<dyn Fn(&LogRecord) -> Result<(), ScopeError> + Send + Sync>;

/// Handle returned by `LogSource::subscribe`, used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub trait LogSource: Send + Sync {
    fn subscribe(&self, listener: Listener) -> ListenerId;

    /// Returns `false` if the id was not (or no longer) registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Thread-safe multicast of server log records.
///
/// Listeners are invoked in registration order while a shared lock is held,
/// so once `unsubscribe` returns the removed listener sees no further records.
/// A listener must not subscribe or unsubscribe from inside its own callback.
#[derive(Default)]
pub struct ServerLogSource {
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_id: AtomicU64,
}

impl ServerLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a record to every listener. Stops at the first listener error
    /// and returns it.
    pub fn emit(&self, record: &LogRecord) -> Result<(), ScopeError> {
        // Recursive read: a listener may log back into a server that emits here.
        let listeners = self.listeners.read_recursive();
        for (_, listener) in listeners.iter() {
            listener(record)?;
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl LogSource for ServerLogSource {
    fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }
}

impl std::fmt::Debug for ServerLogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerLogSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
