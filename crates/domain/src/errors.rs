//! Error types used throughout the client

use thiserror::Error;

/// Boxed cause carried by [`ChonkieError::ServiceResponse`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the Chonkie cloud client
#[derive(Error, Debug)]
pub enum ChonkieError {
    /// Invalid or missing client configuration. Raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The liveness probe against the service root did not return 200.
    #[error("Chonkie service unavailable (status {status}); please try again in a short while")]
    ServiceUnavailable { status: u16 },

    /// The service answered, but the body could not be decoded into chunks.
    #[error("Invalid response from service: {message}")]
    ServiceResponse {
        message: String,
        #[source]
        source: BoxedCause,
    },

    /// The service rejected the API key (401/403).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Any other non-success status on a chunk request.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Connection, timeout or other transport failure.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`ChonkieError`] for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad configuration - non-retryable
    Config,
    /// Service down or overloaded (liveness failure, 5xx, 429) - retryable
    Unavailable,
    /// Malformed response body - non-retryable
    Response,
    /// Rejected credentials - non-retryable
    Authentication,
    /// Request rejected by the service (4xx) - non-retryable
    Client,
    /// Connection/timeout errors - retryable
    Network,
    /// Bugs and invariant violations
    Internal,
}

impl ChonkieError {
    /// Build a [`ChonkieError::ServiceResponse`] chaining the decode failure.
    pub fn invalid_response(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ServiceResponse { message: message.into(), source: Box::new(source) }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Config,
            Self::ServiceUnavailable { .. } => ErrorCategory::Unavailable,
            Self::ServiceResponse { .. } => ErrorCategory::Response,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Api { status, .. } if *status == 429 || *status >= 500 => {
                ErrorCategory::Unavailable
            }
            Self::Api { .. } => ErrorCategory::Client,
            Self::Network(_) => ErrorCategory::Network,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Whether a caller may reasonably retry the failed operation later
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Unavailable | ErrorCategory::Network)
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::ServiceResponse { .. } => "service_response",
            Self::Authentication(_) => "authentication",
            Self::Api { .. } => "api",
            Self::Network(_) => "network",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ChonkieError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn service_response_chains_source() {
        let cause = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let err = ChonkieError::invalid_response("could not decode chunk records", cause);

        assert_eq!(err.category(), ErrorCategory::Response);
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Invalid response from service: could not decode chunk records"
        );
    }

    #[test]
    fn api_status_drives_category() {
        let throttled = ChonkieError::Api { status: 429, message: "slow down".into() };
        let broken = ChonkieError::Api { status: 502, message: "bad gateway".into() };
        let rejected = ChonkieError::Api { status: 422, message: "bad recipe".into() };

        assert_eq!(throttled.category(), ErrorCategory::Unavailable);
        assert_eq!(broken.category(), ErrorCategory::Unavailable);
        assert_eq!(rejected.category(), ErrorCategory::Client);
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(ChonkieError::Network("refused".into()).is_retryable());
        assert!(ChonkieError::ServiceUnavailable { status: 503 }.is_retryable());
        assert!(!ChonkieError::Configuration("missing credential".into()).is_retryable());
        assert!(!ChonkieError::Authentication("bad key".into()).is_retryable());
        assert!(!ChonkieError::Internal("oops".into()).is_retryable());
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(ChonkieError::ServiceUnavailable { status: 500 }.label(), "service_unavailable");
        assert_eq!(ChonkieError::Network("x".into()).label(), "network");
    }
}
