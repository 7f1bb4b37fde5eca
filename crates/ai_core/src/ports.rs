//! Port definitions for generative engines
//!
//! Defines the trait that generative API adapters must implement.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::{
    error::GenerationError,
    types::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse},
};

/// A chunk of a streaming response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingChunk {
    /// Text delta
    pub content: String,
    /// Whether this is the final chunk
    pub done: bool,
}

/// Type alias for streaming response
pub type StreamingResponse =
    Pin<Box<dyn Stream<Item = Result<StreamingChunk, GenerationError>> + Send>>;

/// Port for generative engine implementations
#[async_trait]
pub trait GenerativeEngine: Send + Sync {
    /// One-shot content generation
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError>;

    /// Streamed content generation (text increments)
    async fn generate_content_stream(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<StreamingResponse, GenerationError>;

    /// Image generation
    async fn generate_images(
        &self,
        model: &str,
        request: PredictRequest,
    ) -> Result<PredictResponse, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_chunk_serialization() {
        let chunk = StreamingChunk {
            content: "Photo".to_string(),
            done: false,
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(json, r#"{"content":"Photo","done":false}"#);
    }
}
