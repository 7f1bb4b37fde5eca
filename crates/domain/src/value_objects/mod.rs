//! Value objects - Immutable, identity-less domain primitives

mod chat_session_id;
mod class_level;
mod detail_level;
mod note_key;

pub use chat_session_id::ChatSessionId;
pub use class_level::ClassLevel;
pub use detail_level::DetailLevel;
pub use note_key::{NOTE_KEY_PREFIX, NoteKey, normalize_key_text};
