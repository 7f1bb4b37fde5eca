//! Configuration for the Gemini client

use serde::{Deserialize, Serialize};

/// Connection and model settings for the hosted Gemini API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL including the API version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model for notes, quizzes and chat
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Imagen model for illustrations
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Text-to-speech model
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    /// Prebuilt voice used for narration
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

const fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            voice: default_voice(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
