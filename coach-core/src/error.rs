//! Error taxonomy shared by the coach pipeline crates.

use thiserror::Error;

/// Errors that can occur anywhere in the coach pipeline.
///
/// The orchestrator catches every variant at its boundary and degrades to a
/// well-formed unverified response; none of these are fatal to the serving
/// process.
#[derive(Debug, Clone, Error)]
pub enum CoachError {
    /// An external collaborator (store, verifier, embedding service) was
    /// unreachable or returned an error.
    #[error("External service error ({service}): {message}")]
    ExternalService {
        /// The collaborator that produced the error.
        service: String,
        /// A description of the failure.
        message: String,
    },

    /// Malformed solution or step text that could not be parsed.
    ///
    /// Handled by falling back to a synthetic single-step representation,
    /// never by rejecting the request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A completion call failed.
    ///
    /// `retryable` distinguishes transient failures (timeouts, rate limits,
    /// server-class errors) eligible for retry and fallback from terminal
    /// ones that must be re-raised immediately.
    #[error("Completion error [{code}]: {message}")]
    Completion {
        /// A stable machine-readable code (`timeout`, `rate_limited`,
        /// `server_error`, `invalid_json`, ...).
        code: String,
        /// A description of the failure.
        message: String,
        /// Whether the failure is transient and worth retrying.
        retryable: bool,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoachError {
    /// A transient completion failure eligible for retry and fallback.
    pub fn completion_transient(code: impl Into<String>, message: impl Into<String>) -> Self {
        CoachError::Completion { code: code.into(), message: message.into(), retryable: true }
    }

    /// A terminal completion failure that must be re-raised immediately.
    pub fn completion_terminal(code: impl Into<String>, message: impl Into<String>) -> Self {
        CoachError::Completion { code: code.into(), message: message.into(), retryable: false }
    }

    /// True for transient failures eligible for bounded retry.
    ///
    /// Only completion errors explicitly flagged retryable qualify;
    /// parse and validation errors are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoachError::Completion { retryable: true, .. })
    }
}

/// A convenience result type for coach operations.
pub type Result<T> = std::result::Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_retryable_completion_errors_are_retryable() {
        let transient = CoachError::Completion {
            code: "timeout".into(),
            message: "deadline exceeded".into(),
            retryable: true,
        };
        let terminal = CoachError::Completion {
            code: "invalid_json".into(),
            message: "expected object".into(),
            retryable: false,
        };
        let external = CoachError::ExternalService {
            service: "verifier".into(),
            message: "connection refused".into(),
        };

        assert!(transient.is_retryable());
        assert!(!terminal.is_retryable());
        assert!(!external.is_retryable());
        assert!(!CoachError::Validation("bad step".into()).is_retryable());
    }

    #[test]
    fn display_includes_service_and_code() {
        let err = CoachError::ExternalService {
            service: "document-store".into(),
            message: "timeout".into(),
        };
        assert_eq!(err.to_string(), "External service error (document-store): timeout");

        let err = CoachError::Completion {
            code: "rate_limited".into(),
            message: "slow down".into(),
            retryable: true,
        };
        assert_eq!(err.to_string(), "Completion error [rate_limited]: slow down");
    }
}
