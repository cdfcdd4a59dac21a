//! Error types for the threshold engine.

use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Invalid input shapes (out-of-range priorities, non-finite numbers) are
/// reported as `ValidationError` with the offending field named. Data-driven
/// conditions such as an empty outcome history are never errors; those paths
/// resolve through fallbacks instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
