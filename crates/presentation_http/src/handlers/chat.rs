//! Chat handlers

use std::time::Duration;

use application::CHAT_GREETING;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use domain::{ChatSessionId, DomainError};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Opening message shown before the first question
#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub role: &'static str,
    pub content: &'static str,
}

/// Created session handle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
}

/// Student message body
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

fn parse_session_id(raw: &str) -> Result<ChatSessionId, ApiError> {
    ChatSessionId::parse(raw)
        .map_err(|_| DomainError::ValidationError(format!("invalid session id: {raw}")).into())
}

/// `GET /chat`
pub async fn greeting() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        role: "model",
        content: CHAT_GREETING,
    })
}

/// `POST /chat/sessions`
#[instrument(skip(state))]
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let id = state.chat.create_session();
    debug!(session = %id, "Chat session created");
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: id.to_string(),
        }),
    )
}

/// `POST /chat/sessions/{id}/messages`
///
/// Streams the reply as SSE `data:` events of `{"content", "done"}`; the last
/// event has `done` set.
#[instrument(skip(state, request), fields(message_len = request.message.len()))]
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let id = parse_session_id(&id)?;
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let replies = state.chat.send(id, &request.message)?;
    let events = ReceiverStream::new(replies).map(|chunk| Event::default().json_data(&chunk));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

/// `DELETE /chat/sessions/{id}`
#[instrument(skip(state))]
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    if state.chat.close_session(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("chat session {id}")))
    }
}
