//! Speech processing errors

use ai_core::GenerationError;
use thiserror::Error;

/// Errors that can occur during speech synthesis
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Response carried no usable audio
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Audio payload could not be decoded
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Audio processing/conversion failed
    #[error("Audio processing failed: {0}")]
    AudioProcessing(String),

    /// Timeout during processing
    #[error("Speech processing timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl From<GenerationError> for SpeechError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::ConnectionFailed(msg) | GenerationError::StreamError(msg) => {
                Self::ConnectionFailed(msg)
            },
            GenerationError::Timeout => Self::Timeout,
            GenerationError::RateLimited => Self::RateLimited,
            GenerationError::InvalidResponse(msg) => Self::InvalidResponse(msg),
            GenerationError::Blocked(reason) => Self::SynthesisFailed(format!("blocked: {reason}")),
            GenerationError::RequestFailed(msg) | GenerationError::ServerError(msg) => {
                Self::RequestFailed(msg)
            },
        }
    }
}

impl From<hound::Error> for SpeechError {
    fn from(err: hound::Error) -> Self {
        Self::AudioProcessing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_failed_error_message() {
        let err = SpeechError::SynthesisFailed("empty text".to_string());
        assert_eq!(err.to_string(), "Synthesis failed: empty text");
    }

    #[test]
    fn generation_errors_map_over() {
        assert!(matches!(
            SpeechError::from(GenerationError::RateLimited),
            SpeechError::RateLimited
        ));
        assert!(matches!(
            SpeechError::from(GenerationError::Timeout),
            SpeechError::Timeout
        ));
        assert!(matches!(
            SpeechError::from(GenerationError::ServerError("x".into())),
            SpeechError::RequestFailed(_)
        ));
    }
}
