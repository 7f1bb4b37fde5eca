//! Route definitions

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Catalog
        .route("/", get(handlers::catalog::home))
        .route("/subject/{id}", get(handlers::catalog::subject))
        .route("/search", get(handlers::catalog::search))
        // Notes and quizzes
        .route("/notes/{class}/{subject}/{topic}", get(handlers::notes::notes))
        .route("/notes/{class}/{subject}/{topic}/quiz", get(handlers::notes::quiz))
        // Narration
        .route("/speech", post(handlers::speech::speak))
        // Tutor chat
        .route("/chat", get(handlers::chat::greeting))
        .route("/chat/sessions", post(handlers::chat::create_session))
        .route("/chat/sessions/{id}", delete(handlers::chat::close_session))
        .route(
            "/chat/sessions/{id}/messages",
            post(handlers::chat::send_message),
        )
        // Settings
        .route("/settings", get(handlers::settings::settings))
        .route(
            "/settings/saved-notes/{key}",
            delete(handlers::settings::delete_saved_note),
        )
        // Health
        .route("/health", get(handlers::health::health_check))
        // Unknown paths go home
        .fallback(|| async { Redirect::to("/") })
        .with_state(state)
}
