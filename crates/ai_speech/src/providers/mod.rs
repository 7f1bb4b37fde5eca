//! Speech provider implementations

pub mod gemini;

pub use gemini::GeminiSpeechProvider;
