//! Narration handler

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// `POST /speech` body
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    /// Plain text or note HTML
    pub text: String,
}

/// Synthesize narration and return it as a WAV body
#[instrument(skip(state, request), fields(text_len = request.text.len()))]
pub async fn speak(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Response, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text cannot be empty".to_string()));
    }

    let clip = state
        .narration
        .narrate(&request.text)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("Speech is unavailable".to_string()))?;

    Ok(([(header::CONTENT_TYPE, clip.container.mime_type())], clip.data).into_response())
}
