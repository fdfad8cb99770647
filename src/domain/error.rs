use thiserror::Error;

/// Failures raised by the collaborators of a log scope.
///
/// None of these are caught by the scope itself. They travel back to whoever
/// triggered the failing operation.
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Logger creation failed for '{name}'")]
    LoggerCreation {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Logger '{logger}' failed to write: {reason}")]
    Sink { logger: String, reason: String },

    #[error("Wrapped resource release failed: {0}")]
    Release(String),
}

impl ScopeError {
    pub fn logger_creation(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ScopeError::LoggerCreation {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn sink(logger: impl Into<String>, reason: impl Into<String>) -> Self {
        ScopeError::Sink {
            logger: logger.into(),
            reason: reason.into(),
        }
    }
}
