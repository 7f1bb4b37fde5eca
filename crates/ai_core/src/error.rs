//! Generation errors

use thiserror::Error;

/// Errors that can occur while calling the generative API
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Failed to connect to the API
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request was rejected (bad request, invalid key, forbidden)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response could not be parsed or had no usable content
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Quota or rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Upstream server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Error while reading a streamed response
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Prompt or output blocked by safety filters
    #[error("Content blocked: {0}")]
    Blocked(String),
}

impl GenerationError {
    /// Whether the failure came from the transport rather than the content
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout | Self::StreamError(_)
        )
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_are_classified() {
        assert!(GenerationError::Timeout.is_connection_error());
        assert!(GenerationError::StreamError("reset".into()).is_connection_error());
        assert!(!GenerationError::RateLimited.is_connection_error());
        assert!(!GenerationError::Blocked("SAFETY".into()).is_connection_error());
    }

    #[test]
    fn error_messages() {
        assert_eq!(GenerationError::RateLimited.to_string(), "Rate limit exceeded");
        assert_eq!(
            GenerationError::ServerError("Status 500".into()).to_string(),
            "Server error: Status 500"
        );
    }
}
