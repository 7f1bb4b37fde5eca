//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No API credential configured
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Network failure talking to the AI service
    #[error("Connection error: {0}")]
    Connection(String),

    /// AI service rejected the request or returned unusable output
    #[error("Generation error: {0}")]
    Generation(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cache storage failure
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Connection(_))
    }

    /// Whether the failure was a lost or refused connection
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::RateLimited.is_retryable());
        assert!(ApplicationError::Connection("reset".into()).is_retryable());
        assert!(!ApplicationError::NotConfigured("key".into()).is_retryable());
        assert!(!ApplicationError::Generation("bad".into()).is_retryable());
    }

    #[test]
    fn domain_errors_convert() {
        let err: ApplicationError = DomainError::InvalidClassLevel("S9".into()).into();
        assert_eq!(err.to_string(), "Invalid class level: S9");
    }
}
