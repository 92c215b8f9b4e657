//! Error types for the assistant core.

use thiserror::Error;

/// Errors raised while building configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing {0} environment variable")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Errors that can occur in the assistant core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The reasoning service could not be reached or rejected the request.
    #[error("model request failed: {0}")]
    ModelRequest(String),

    /// The reasoning service answered with an unexpected body.
    #[error("model response could not be parsed: {0}")]
    ModelResponse(String),

    /// Storage failure.
    #[error("storage error: {0}")]
    Persistence(#[from] saver_persistence::PersistenceError),

    /// A notification could not be delivered.
    #[error("delivery failed: {0}")]
    Notify(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
