//! Error types for the run configuration registry

use thiserror::Error;

/// Result type alias using RunConfigurationError
pub type Result<T> = std::result::Result<T, RunConfigurationError>;

/// Errors raised by the registry, its providers and executors
#[derive(Debug, Error)]
pub enum RunConfigurationError {
    /// No provider handles configurations of this type
    #[error("No run configuration provider registered for type '{0}'")]
    ProviderNotRegistered(String),

    /// No executor handles configurations of this type
    #[error("No run configuration executor registered for type '{0}'")]
    ExecutorNotRegistered(String),

    /// A configuration was handed to code expecting another type
    #[error("Run configuration '{name}' has type '{actual}', expected '{expected}'")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// A configuration cannot be executed as it stands
    #[error("Invalid run configuration '{name}': {reason}")]
    InvalidConfiguration { name: String, reason: String },

    /// Backing store failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings file could not be read or written
    #[error("Settings error: {0}")]
    Settings(#[from] std::io::Error),
}

impl RunConfigurationError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a backing key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}
