use super::ServerLogSource;
use crate::domain::{
    EventId, LogError, LogLevel, LogRecord, LogWrite, MessageState, default_formatter,
};
use crate::sink::FORWARDED_TARGET;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Publishes every tracing event of the server under test to a
/// `ServerLogSource`.
///
/// The event target becomes the origin logger name. Recognised fields:
/// `message`, `event_id` (integer), `event_name` and `error`; every other
/// field is kept on the `MessageState`. Events this crate forwards are
/// skipped, so server and test may share one subscriber.
pub struct ServerLogLayer {
    source: Arc<ServerLogSource>,
}

impl ServerLogLayer {
    pub fn new(source: Arc<ServerLogSource>) -> Self {
        Self { source }
    }
}

impl<S> Layer<S> for ServerLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(FORWARDED_TARGET) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let write = visitor.into_write(metadata.target(), LogLevel::from(metadata.level()));

        // The tracing dispatch has no error channel back to the server.
        if let Err(e) = self.source.emit(&LogRecord::new(write)) {
            eprintln!("Warning: server log listener failed: {e}");
        }
    }
}

/// Error value rebuilt from a recorded `error` field.
#[derive(Debug)]
struct RecordedError(String);

impl fmt::Display for RecordedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for RecordedError {}

#[derive(Default)]
struct RecordVisitor {
    state: MessageState,
    event_id: EventId,
    error: Option<String>,
}

impl RecordVisitor {
    fn into_write(self, target: &str, level: LogLevel) -> LogWrite {
        let mut write = LogWrite::with_state(
            target,
            level,
            self.event_id,
            Arc::new(self.state),
            default_formatter(),
        );
        if let Some(error) = self.error {
            let error: LogError = Arc::new(RecordedError(error));
            write = write.with_error(error);
        }
        write
    }

    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.state.message = value,
            "event_name" => self.event_id.name = Some(value),
            "error" => self.error = Some(value),
            name => self.state.fields.push((name.to_string(), value)),
        }
    }

    fn record_integer(&mut self, field: &Field, value: i128) {
        if field.name() == "event_id"
            && let Ok(id) = i32::try_from(value)
        {
            self.event_id.id = id;
            return;
        }
        self.record_text(field, value.to_string());
    }
}

impl Visit for RecordVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_integer(field, i128::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_integer(field, i128::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_text(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{value:?}"));
    }
}
