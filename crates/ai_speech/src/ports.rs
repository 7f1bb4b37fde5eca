//! Port definitions for speech synthesis

use async_trait::async_trait;

use crate::{error::SpeechError, types::AudioData};

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to playable speech
    ///
    /// Uses the provider's default voice when `voice` is `None`.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError>;

    /// Name of the TTS model
    fn model_name(&self) -> &str;

    /// Default voice identifier
    fn default_voice(&self) -> &str;
}
