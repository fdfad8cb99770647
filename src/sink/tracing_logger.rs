use super::{Logger, LoggerFactory};
use crate::domain::{EventId, Formatter, LogError, LogLevel, LogState, ScopeError};
use std::sync::Arc;
use tracing::callsite::{Callsite, Identifier};
use tracing::field::{FieldSet, Value, display};
use tracing::metadata::Kind;
use tracing::subscriber::Interest;
use tracing::{Dispatch, Event, Level, Metadata};

/// Target of every event written by a `TracingLogger`.
pub const FORWARDED_TARGET: &str = "server_log_scope::forwarded";

const FIELDS: &[&str] = &["message", "logger", "event_id", "event_name", "error"];

/// Callsite for forwarded events. There is one per tracing level because the
/// level is part of the static metadata.
struct ForwardCallsite(&'static Metadata<'static>);

impl Callsite for ForwardCallsite {
    fn set_interest(&self, _interest: Interest) {}

    fn metadata(&self) -> &Metadata<'_> {
        self.0
    }
}

macro_rules! forward_callsite {
    ($meta:ident, $callsite:ident, $level:expr) => {
        static $meta: Metadata<'static> = Metadata::new(
            "forwarded server log",
            FORWARDED_TARGET,
            $level,
            None,
            None,
            Some(module_path!()),
            FieldSet::new(FIELDS, Identifier(&$callsite)),
            Kind::EVENT,
        );
        static $callsite: ForwardCallsite = ForwardCallsite(&$meta);
    };
}

forward_callsite!(TRACE_META, TRACE_CALLSITE, Level::TRACE);
forward_callsite!(DEBUG_META, DEBUG_CALLSITE, Level::DEBUG);
forward_callsite!(INFO_META, INFO_CALLSITE, Level::INFO);
forward_callsite!(WARN_META, WARN_CALLSITE, Level::WARN);
forward_callsite!(ERROR_META, ERROR_CALLSITE, Level::ERROR);

fn metadata_for(level: LogLevel) -> Option<&'static Metadata<'static>> {
    match level {
        LogLevel::Trace => Some(&TRACE_META),
        LogLevel::Debug => Some(&DEBUG_META),
        LogLevel::Information => Some(&INFO_META),
        LogLevel::Warning => Some(&WARN_META),
        // tracing has no level above ERROR.
        LogLevel::Error | LogLevel::Critical => Some(&ERROR_META),
        LogLevel::None => None,
    }
}

/// Creates loggers that write into one `tracing` dispatcher.
///
/// Records are handed to the dispatcher directly instead of through the
/// thread-local default. Forwarding usually runs inside a server
/// subscriber's `on_event`, where tracing would otherwise drop nested events.
#[derive(Clone)]
pub struct TracingLoggerFactory {
    dispatch: Dispatch,
}

impl TracingLoggerFactory {
    /// Bind to the dispatcher that is current on the calling thread.
    pub fn new() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }
}

impl Default for TracingLoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerFactory for TracingLoggerFactory {
    fn create_logger(&self, name: &str) -> Result<Arc<dyn Logger>, ScopeError> {
        Ok(Arc::new(TracingLogger::new(name, self.dispatch.clone())))
    }
}

/// tracing targets are static, so the logger name travels as the `logger`
/// field instead.
#[derive(Clone)]
pub struct TracingLogger {
    name: String,
    dispatch: Dispatch,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>, dispatch: Dispatch) -> Self {
        Self {
            name: name.into(),
            dispatch,
        }
    }
}

impl std::fmt::Debug for TracingLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingLogger").field("name", &self.name).finish()
    }
}

impl Logger for TracingLogger {
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
        let Some(metadata) = metadata_for(level) else {
            return Ok(());
        };
        if !self.dispatch.enabled(metadata) {
            return Ok(());
        }

        let fields = metadata.fields();
        let mut iter = fields.iter();
        let (
            Some(message_field),
            Some(logger_field),
            Some(id_field),
            Some(name_field),
            Some(error_field),
        ) = (iter.next(), iter.next(), iter.next(), iter.next(), iter.next())
        else {
            return Err(ScopeError::sink(&self.name, "forwarding callsite is missing fields"));
        };

        let message = formatter(state, error);
        let message = display(&message);
        let logger = display(&self.name);
        let event_name = event_id.name.as_deref();
        let error = error.map(ToString::to_string);
        let error = error.as_deref();

        let values: [(&tracing::field::Field, Option<&dyn Value>); 5] = [
            (&message_field, Some(&message as &dyn Value)),
            (&logger_field, Some(&logger as &dyn Value)),
            (&id_field, Some(&event_id.id as &dyn Value)),
            (&name_field, event_name.as_ref().map(|name| name as &dyn Value)),
            (&error_field, error.as_ref().map(|error| error as &dyn Value)),
        ];
        let value_set = fields.value_set(&values);
        self.dispatch.event(&Event::new(metadata, &value_set));
        Ok(())
    }
}
