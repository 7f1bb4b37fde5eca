//! Application state shared across handlers

use std::sync::Arc;

use application::{
    AiGatewayPort, CachePort, ChatService, NarrationService, NoteComposer, QuizService,
};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Cached note generation
    pub notes: Arc<NoteComposer>,
    /// Five-question quizzes
    pub quizzes: Arc<QuizService>,
    /// Text-to-speech for notes
    pub narration: Arc<NarrationService>,
    /// Tutor chat sessions
    pub chat: Arc<ChatService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire every service onto one gateway and one cache
    pub fn new(
        gateway: Arc<dyn AiGatewayPort>,
        cache: Arc<dyn CachePort>,
        config: AppConfig,
    ) -> Self {
        let notes = NoteComposer::new(Arc::clone(&gateway), cache)
            .with_ttl(config.cache.note_ttl());

        Self {
            notes: Arc::new(notes),
            quizzes: Arc::new(QuizService::new(Arc::clone(&gateway))),
            narration: Arc::new(NarrationService::new(Arc::clone(&gateway))),
            chat: Arc::new(ChatService::new(gateway)),
            config: Arc::new(config),
        }
    }
}
