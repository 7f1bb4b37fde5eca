//! AI Speech - Text-to-Speech for narration
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` defines the [`TextToSpeech`] trait
//! - `providers` contains the Gemini implementation
//! - `converter` turns raw PCM into a playable WAV container

pub mod converter;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use converter::{PcmSpec, pcm_to_wav};
pub use error::SpeechError;
pub use ports::TextToSpeech;
pub use providers::GeminiSpeechProvider;
pub use types::{AudioData, AudioFormat};
