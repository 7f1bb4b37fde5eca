//! AI Core - Generative model client
//!
//! Provides a typed client for the hosted Gemini API: grounded text
//! generation, JSON-constrained output, streamed chat, speech and Imagen
//! illustrations.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;
pub mod types;

pub use config::GeminiConfig;
pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use ports::{GenerativeEngine, StreamingChunk, StreamingResponse};
