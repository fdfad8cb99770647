use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque payload of a log write. Shared so forwarding never copies it.
pub type LogState = Arc<dyn Any + Send + Sync>;

/// Error value attached to a log write.
pub type LogError = Arc<dyn std::error::Error + Send + Sync>;

/// Renders a state payload (and its error, if any) to text.
pub type Formatter = Arc<dyn Fn(&LogState, Option<&LogError>) -> String + Send + Sync>;

/// Identifies a kind of log event: a numeric id and an optional name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventId {
    pub id: i32,
    pub name: Option<String>,
}

impl EventId {
    pub fn new(id: i32) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.id),
        }
    }
}

/// State payload for plain message writes: the rendered message and any
/// extra key/value fields the server attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageState {
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl MessageState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

impl fmt::Display for MessageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Formatter for `MessageState`, `String` and `&'static str` payloads.
///
/// The error is not part of the rendered text; sinks record it separately.
pub fn default_formatter() -> Formatter {
    Arc::new(|state: &LogState, _error: Option<&LogError>| {
        if let Some(message) = state.downcast_ref::<MessageState>() {
            message.to_string()
        } else if let Some(text) = state.downcast_ref::<String>() {
            text.clone()
        } else if let Some(text) = state.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else {
            "[unformattable state]".to_string()
        }
    })
}

/// The payload of a server log notification.
#[derive(Clone)]
pub struct LogWrite {
    pub logger_name: String,
    pub level: LogLevel,
    pub event_id: EventId,
    pub state: LogState,
    pub error: Option<LogError>,
    pub formatter: Formatter,
}

impl LogWrite {
    /// A plain message write with event id 0 and no error.
    pub fn new(
        logger_name: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            event_id: EventId::default(),
            state: Arc::new(MessageState::new(message)),
            error: None,
            formatter: default_formatter(),
        }
    }

    pub fn with_state(
        logger_name: impl Into<String>,
        level: LogLevel,
        event_id: EventId,
        state: LogState,
        formatter: Formatter,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            event_id,
            state,
            error: None,
            formatter,
        }
    }

    pub fn with_error(mut self, error: LogError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn render(&self) -> String {
        (self.formatter)(&self.state, self.error.as_ref())
    }
}

impl fmt::Debug for LogWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogWrite")
            .field("logger_name", &self.logger_name)
            .field("level", &self.level)
            .field("event_id", &self.event_id)
            .field("message", &self.render())
            .field("error", &self.error.as_ref().map(ToString::to_string))
            .finish()
    }
}

/// A single notification from the server log stream.
///
/// `write` is `None` for empty notifications.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub write: Option<LogWrite>,
}

impl LogRecord {
    pub fn new(write: LogWrite) -> Self {
        Self {
            timestamp: Utc::now(),
            write: Some(write),
        }
    }

    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            write: None,
        }
    }
}
