//! Application services

mod chat_service;
mod narration_service;
mod note_composer;
mod playback_controller;
mod quiz_service;

pub use chat_service::{
    CHAT_CONNECTION_ERROR_MESSAGE, CHAT_ERROR_MESSAGE, CHAT_GREETING, ChatChunk, ChatService,
    TUTOR_SYSTEM_INSTRUCTION,
};
pub use narration_service::{MAX_SPEECH_CHARS, NarrationService, speech_text};
pub use note_composer::{
    CONNECTION_ERROR_HTML, IMAGE_PLACEHOLDER, MISSING_KEY_HTML, NOTES_ERROR_HTML, NoteComposer,
    place_image, strip_code_fences,
};
pub use playback_controller::PlaybackController;
pub use quiz_service::QuizService;
