//! Gemini text-to-speech provider
//!
//! Requests `AUDIO` output from a Gemini TTS model and wraps the returned
//! PCM into WAV.

use std::{fmt, sync::Arc};

use ai_core::{
    GenerativeEngine,
    types::{GenerateContentRequest, GenerationConfig},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{debug, instrument};

use crate::{
    converter::{PcmSpec, pcm_to_wav},
    error::SpeechError,
    ports::TextToSpeech,
    types::AudioData,
};

/// TTS through a Gemini speech model
pub struct GeminiSpeechProvider {
    engine: Arc<dyn GenerativeEngine>,
    model: String,
    voice: String,
}

impl fmt::Debug for GeminiSpeechProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSpeechProvider")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

impl GeminiSpeechProvider {
    pub fn new(
        engine: Arc<dyn GenerativeEngine>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            model: model.into(),
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl TextToSpeech for GeminiSpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let voice = voice.unwrap_or(&self.voice);
        let request = GenerateContentRequest::prompt(text)
            .with_generation_config(GenerationConfig::speech(voice));

        let response = self.engine.generate_content(&self.model, request).await?;

        let inline = response.inline_data().ok_or_else(|| {
            SpeechError::InvalidResponse("response contained no audio".to_string())
        })?;

        let pcm = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| SpeechError::InvalidAudio(format!("base64 decode failed: {e}")))?;

        if pcm.is_empty() {
            return Err(SpeechError::InvalidResponse("audio payload is empty".to_string()));
        }

        debug!(mime_type = %inline.mime_type, pcm_len = pcm.len(), "Received speech audio");

        pcm_to_wav(&pcm, PcmSpec::from_mime_type(&inline.mime_type))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn default_voice(&self) -> &str {
        &self.voice
    }
}
