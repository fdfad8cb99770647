//! Domain layer for server-log-scope.
//!
//! Contains the types shared by the source, sink and scope modules:
//! - `LogRecord` / `LogWrite`: a server log notification and its payload
//! - `LogLevel`: ordered record severity (Trace..Critical, None)
//! - `ScopeError`: collaborator failures that propagate to callers

pub mod error;
pub mod log_level;
pub mod log_record;

pub use error::ScopeError;
pub use log_level::LogLevel;
pub use log_record::{
    EventId, Formatter, LogError, LogRecord, LogState, LogWrite, MessageState, default_formatter,
};
