//! Gemini REST client
//!
//! Talks to the `v1beta` Generative Language API with an API key header.

mod client;
mod streaming;

pub use client::GeminiClient;
