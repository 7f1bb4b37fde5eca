//! AI gateway port - Interface to the hosted generative service

use std::pin::Pin;

use async_trait::async_trait;
use domain::{
    ChatMessage, ClassLevel, DetailLevel, GeneratedImage, QuizQuestion, SearchResult, SpeechClip,
};
use futures::Stream;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Identifies one set of notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesRequest {
    pub topic: String,
    pub subject: String,
    pub class_level: ClassLevel,
    pub detail_level: DetailLevel,
}

impl NotesRequest {
    pub fn new(
        topic: impl Into<String>,
        subject: impl Into<String>,
        class_level: ClassLevel,
        detail_level: DetailLevel,
    ) -> Self {
        Self {
            topic: topic.into(),
            subject: subject.into(),
            class_level,
            detail_level,
        }
    }
}

/// Raw model output for a notes request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedNotes {
    /// HTML as returned by the model, possibly wrapped in code fences
    pub html: String,
    /// Citations in response order, duplicates included
    pub sources: Vec<SearchResult>,
}

/// Stream of chat text increments
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ApplicationError>> + Send>>;

/// Port for the generative AI service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AiGatewayPort: Send + Sync {
    /// Grounded HTML study notes
    async fn generate_notes(&self, request: &NotesRequest)
    -> Result<GeneratedNotes, ApplicationError>;

    /// Illustration for a topic; `None` when the model returned no image
    async fn generate_image(
        &self,
        topic: &str,
        subject: &str,
    ) -> Result<Option<GeneratedImage>, ApplicationError>;

    /// Multiple-choice questions, unvalidated
    async fn generate_quiz(
        &self,
        topic: &str,
        subject: &str,
        class_level: ClassLevel,
    ) -> Result<Vec<QuizQuestion>, ApplicationError>;

    /// Spoken narration of `text`; `None` when the model returned no audio
    async fn generate_speech(&self, text: &str) -> Result<Option<SpeechClip>, ApplicationError>;

    /// Stream a tutor reply given prior turns
    async fn chat_stream(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<TextStream, ApplicationError>;
}
