//! Error types for the `coach-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// An error occurred in the document store backend.
    #[error("Document store error ({backend}): {message}")]
    StoreError {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<RetrievalError> for coach_core::CoachError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::StoreError { backend, message } => {
                coach_core::CoachError::ExternalService { service: backend, message }
            }
            RetrievalError::EmbeddingError { provider, message } => {
                coach_core::CoachError::ExternalService { service: provider, message }
            }
            RetrievalError::ConfigError(msg) => coach_core::CoachError::Config(msg),
        }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
