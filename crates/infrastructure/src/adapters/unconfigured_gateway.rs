//! Gateway used when no API key is configured
//!
//! Every call fails fast with `NotConfigured` and performs no network I/O.

use application::{
    error::ApplicationError,
    ports::{AiGatewayPort, GeneratedNotes, NotesRequest, TextStream},
};
use async_trait::async_trait;
use domain::{ChatMessage, ClassLevel, GeneratedImage, QuizQuestion, SpeechClip};

const MISSING_KEY: &str = "Gemini API key is not set (PEARL_GEMINI__API_KEY, GEMINI_API_KEY or API_KEY)";

#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGateway;

fn not_configured() -> ApplicationError {
    ApplicationError::NotConfigured(MISSING_KEY.to_string())
}

#[async_trait]
impl AiGatewayPort for UnconfiguredGateway {
    async fn generate_notes(
        &self,
        _request: &NotesRequest,
    ) -> Result<GeneratedNotes, ApplicationError> {
        Err(not_configured())
    }

    async fn generate_image(
        &self,
        _topic: &str,
        _subject: &str,
    ) -> Result<Option<GeneratedImage>, ApplicationError> {
        Err(not_configured())
    }

    async fn generate_quiz(
        &self,
        _topic: &str,
        _subject: &str,
        _class_level: ClassLevel,
    ) -> Result<Vec<QuizQuestion>, ApplicationError> {
        Err(not_configured())
    }

    async fn generate_speech(&self, _text: &str) -> Result<Option<SpeechClip>, ApplicationError> {
        Err(not_configured())
    }

    async fn chat_stream(
        &self,
        _system_instruction: &str,
        _history: &[ChatMessage],
        _message: &str,
    ) -> Result<TextStream, ApplicationError> {
        Err(not_configured())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use application::{MISSING_KEY_HTML, NoteComposer};
    use domain::DetailLevel;

    use super::*;
    use crate::cache::MokaCache;

    #[tokio::test]
    async fn every_call_is_not_configured() {
        let gateway = UnconfiguredGateway;
        assert!(matches!(
            gateway.generate_image("a", "b").await,
            Err(ApplicationError::NotConfigured(_))
        ));
        assert!(matches!(
            gateway.generate_speech("hi").await,
            Err(ApplicationError::NotConfigured(_))
        ));
        assert!(gateway.chat_stream("", &[], "hi").await.is_err());
    }

    #[tokio::test]
    async fn composer_shows_missing_key_message() {
        let composer = NoteComposer::new(Arc::new(UnconfiguredGateway), Arc::new(MokaCache::default()));
        let request = NotesRequest::new("Cells", "Biology", ClassLevel::S1, DetailLevel::Concise);
        let note = composer.compose(&request).await;
        assert_eq!(note.html_content, MISSING_KEY_HTML);
    }
}
