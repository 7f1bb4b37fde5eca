//! Gemini gateway adapter - Implements AiGatewayPort using ai_core
//!
//! Builds the prompts, calls the text, image and speech models, and maps
//! their errors into the application taxonomy.

use std::{iter, sync::Arc};

use ai_core::{
    GeminiClient, GeminiConfig, GenerationError, GenerativeEngine,
    types::{Content, GenerateContentRequest, GenerationConfig, PredictRequest},
};
use ai_speech::{GeminiSpeechProvider, SpeechError, TextToSpeech};
use application::{
    error::ApplicationError,
    ports::{AiGatewayPort, GeneratedNotes, NotesRequest, TextStream},
};
use async_trait::async_trait;
use domain::{
    ChatMessage, ClassLevel, GeneratedImage, QuizQuestion, SearchResult, SpeechClip,
};
use futures::StreamExt;
use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use super::prompts;

/// Adapter for the hosted Gemini API
pub struct GeminiGatewayAdapter {
    engine: Arc<dyn GenerativeEngine>,
    speech: GeminiSpeechProvider,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiGatewayAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGatewayAdapter")
            .field("text_model", &self.config.text_model)
            .field("image_model", &self.config.image_model)
            .field("speech", &self.speech)
            .finish_non_exhaustive()
    }
}

impl GeminiGatewayAdapter {
    /// Create an adapter talking to the configured endpoint
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Result<Self, ApplicationError> {
        let client = GeminiClient::new(config.clone(), api_key)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        info!(
            base_url = %config.base_url,
            text_model = %config.text_model,
            "Gemini gateway configured"
        );
        Ok(Self::with_engine(Arc::new(client), config))
    }

    /// Create an adapter over any generative engine
    pub fn with_engine(engine: Arc<dyn GenerativeEngine>, config: GeminiConfig) -> Self {
        let speech = GeminiSpeechProvider::new(
            Arc::clone(&engine),
            config.speech_model.clone(),
            config.voice.clone(),
        );
        Self {
            engine,
            speech,
            config,
        }
    }

    /// Convert ai_core error to application error
    fn map_error(e: GenerationError) -> ApplicationError {
        match e {
            GenerationError::RateLimited => ApplicationError::RateLimited,
            e if e.is_connection_error() => ApplicationError::Connection(e.to_string()),
            other => ApplicationError::Generation(other.to_string()),
        }
    }

    fn map_speech_error(e: SpeechError) -> ApplicationError {
        match e {
            SpeechError::RateLimited => ApplicationError::RateLimited,
            SpeechError::ConnectionFailed(_) | SpeechError::Timeout => {
                ApplicationError::Connection(e.to_string())
            },
            other => ApplicationError::Generation(other.to_string()),
        }
    }
}

#[async_trait]
impl AiGatewayPort for GeminiGatewayAdapter {
    #[instrument(skip(self, request), fields(topic = %request.topic, detail = %request.detail_level))]
    async fn generate_notes(
        &self,
        request: &NotesRequest,
    ) -> Result<GeneratedNotes, ApplicationError> {
        let body = GenerateContentRequest::prompt(prompts::notes_prompt(request))
            .with_google_search()
            .with_generation_config(GenerationConfig::without_thinking());

        let response = self
            .engine
            .generate_content(&self.config.text_model, body)
            .await
            .map_err(Self::map_error)?;

        let html = response.text();
        if html.trim().is_empty() {
            return Err(ApplicationError::Generation(
                "model returned no text".to_string(),
            ));
        }

        let sources: Vec<SearchResult> = response
            .web_sources()
            .into_iter()
            .filter_map(|web| {
                web.uri
                    .map(|uri| SearchResult::from_web_citation(uri, web.title))
            })
            .collect();

        debug!(html_len = html.len(), sources = sources.len(), "Notes generated");
        Ok(GeneratedNotes { html, sources })
    }

    #[instrument(skip(self))]
    async fn generate_image(
        &self,
        topic: &str,
        subject: &str,
    ) -> Result<Option<GeneratedImage>, ApplicationError> {
        let request = PredictRequest::single_landscape_jpeg(prompts::image_prompt(topic, subject));

        let response = self
            .engine
            .generate_images(&self.config.image_model, request)
            .await
            .map_err(Self::map_error)?;

        let image = response.predictions.into_iter().find_map(|p| {
            p.bytes_base64_encoded
                .filter(|b| !b.is_empty())
                .map(|data| GeneratedImage {
                    mime_type: p.mime_type.unwrap_or_else(|| "image/jpeg".to_string()),
                    base64_data: data,
                })
        });

        if image.is_none() {
            debug!("Image model returned no image");
        }
        Ok(image)
    }

    #[instrument(skip(self))]
    async fn generate_quiz(
        &self,
        topic: &str,
        subject: &str,
        class_level: ClassLevel,
    ) -> Result<Vec<QuizQuestion>, ApplicationError> {
        let body = GenerateContentRequest::prompt(prompts::quiz_prompt(topic, subject, class_level))
            .with_generation_config(GenerationConfig::json(prompts::quiz_schema()));

        let response = self
            .engine
            .generate_content(&self.config.text_model, body)
            .await
            .map_err(Self::map_error)?;

        let text = response.text();
        serde_json::from_str::<Vec<QuizQuestion>>(text.trim()).map_err(|e| {
            warn!(error = %e, "Quiz response was not valid JSON");
            ApplicationError::Generation(format!("malformed quiz JSON: {e}"))
        })
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn generate_speech(&self, text: &str) -> Result<Option<SpeechClip>, ApplicationError> {
        match self.speech.synthesize(text, None).await {
            Ok(audio) => Ok(Some(SpeechClip::from(audio))),
            Err(SpeechError::InvalidResponse(reason)) => {
                debug!(%reason, "Speech model returned no audio");
                Ok(None)
            },
            Err(e) => Err(Self::map_speech_error(e)),
        }
    }

    #[instrument(skip(self, system_instruction, history, message), fields(turns = history.len()))]
    async fn chat_stream(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<TextStream, ApplicationError> {
        let contents = history
            .iter()
            .map(Content::from)
            .chain(iter::once(Content::user(message)))
            .collect();

        let body = GenerateContentRequest {
            contents,
            ..Default::default()
        }
        .with_system_instruction(system_instruction)
        .with_generation_config(GenerationConfig::without_thinking());

        let stream = self
            .engine
            .generate_content_stream(&self.config.text_model, body)
            .await
            .map_err(Self::map_error)?;

        let text = stream.filter_map(|item| async move {
            match item {
                Ok(chunk) if chunk.content.is_empty() => None,
                Ok(chunk) => Some(Ok(chunk.content)),
                Err(e) => Some(Err(Self::map_error(e))),
            }
        });

        Ok(Box::pin(text))
    }
}
