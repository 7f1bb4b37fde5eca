//! Pearl Notes HTTP presentation layer
//!
//! JSON and SSE endpoints for the syllabus catalog, notes, quizzes,
//! narration and tutor chat.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use routes::create_router;
pub use state::AppState;
