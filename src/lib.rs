#![deny(warnings, rust_2024_compatibility)]
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Test-support API
    clippy::module_name_repetitions, // e.g. ScopeError in scope-related modules
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

//! Make the logs of an in-process test server visible in the test's own
//! logging output.
//!
//! ```no_run
//! use server_log_scope::{ServerLogLayer, ServerLogScope, ServerLogSource, TracingLoggerFactory};
//! use std::sync::Arc;
//! use tracing_subscriber::prelude::*;
//!
//! let source = Arc::new(ServerLogSource::new());
//! let server_subscriber =
//!     tracing_subscriber::registry().with(ServerLogLayer::new(source.clone()));
//!
//! let scope = ServerLogScope::new(source, Arc::new(TracingLoggerFactory::new()), None)?;
//! tracing::subscriber::with_default(server_subscriber, || {
//!     tracing::info!(target: "Hub", "client connected");
//! });
//! scope.dispose()?;
//! # Ok::<(), server_log_scope::ScopeError>(())
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod scope;
pub mod sink;
pub mod source;

pub use config::{ConfigError, ScopeConfig};
pub use domain::{EventId, LogLevel, LogRecord, LogWrite, ScopeError};
pub use logging::{LoggingSystem, setup_test_logging};
pub use scope::{LoggerCache, OnRelease, ServerLogScope, WrappedResource};
pub use sink::{Logger, LoggerFactory, TracingLoggerFactory};
pub use source::{ListenerId, LogSource, ServerLogLayer, ServerLogSource};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
