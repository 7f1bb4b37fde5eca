//! Domain entities

mod chat_message;
mod note;
mod quiz;
mod speech_clip;

pub use chat_message::{ChatMessage, MessageRole};
pub use note::{GeneratedImage, NoteContent, SavedNoteSummary, SearchResult, unique_sources};
pub use quiz::{OPTIONS_PER_QUESTION, QUIZ_LENGTH, Quiz, QuizQuestion};
pub use speech_clip::{AudioContainer, SpeechClip};
