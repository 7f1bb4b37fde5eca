//! Notes and quiz handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use application::NotesRequest;
use domain::{ClassLevel, DetailLevel, DomainError, NoteContent, QuizQuestion, Subject, catalog};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// `{class}/{subject}/{topic}` path segments
#[derive(Debug, Deserialize)]
pub struct TopicPath {
    pub class: String,
    pub subject: String,
    pub topic: String,
}

/// `?detail=concise|detailed`
#[derive(Debug, Default, Deserialize)]
pub struct NotesQuery {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Quiz payload; `available` is false when no quiz could be produced
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub available: bool,
    pub questions: Vec<QuizQuestion>,
}

struct ResolvedTopic {
    class_level: ClassLevel,
    subject: &'static Subject,
    topic: String,
}

impl TryFrom<TopicPath> for ResolvedTopic {
    type Error = ApiError;

    fn try_from(path: TopicPath) -> Result<Self, Self::Error> {
        let class_level: ClassLevel = path.class.parse()?;
        let subject = catalog::resolve_subject(&path.subject)
            .ok_or_else(|| DomainError::not_found("Subject", &path.subject))?;
        let topic = path.topic.trim();
        if topic.is_empty() {
            return Err(ApiError::BadRequest("Topic cannot be empty".to_string()));
        }
        // Syllabus topics share one cache entry whatever their casing
        let topic = catalog::canonical_topic_name(subject.id, class_level, topic)
            .map_or_else(|| topic.to_string(), str::to_string);
        Ok(Self {
            class_level,
            subject,
            topic,
        })
    }
}

/// `GET /notes/{class}/{subject}/{topic}`
///
/// Always answers 200 once the path is valid; generation failures arrive as
/// an HTML error fragment inside the note.
#[instrument(skip(state))]
pub async fn notes(
    State(state): State<AppState>,
    Path(path): Path<TopicPath>,
    Query(query): Query<NotesQuery>,
) -> Result<Json<NoteContent>, ApiError> {
    let resolved = ResolvedTopic::try_from(path)?;
    let detail_level = match query.detail.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<DetailLevel>()?,
        _ => DetailLevel::default(),
    };

    let request = NotesRequest::new(
        resolved.topic,
        resolved.subject.name,
        resolved.class_level,
        detail_level,
    );
    Ok(Json(state.notes.compose(&request).await))
}

/// `GET /notes/{class}/{subject}/{topic}/quiz`
#[instrument(skip(state))]
pub async fn quiz(
    State(state): State<AppState>,
    Path(path): Path<TopicPath>,
) -> Result<Json<QuizResponse>, ApiError> {
    let resolved = ResolvedTopic::try_from(path)?;
    let questions = state
        .quizzes
        .quiz_for(&resolved.topic, resolved.subject.name, resolved.class_level)
        .await;

    Ok(Json(QuizResponse {
        available: !questions.is_empty(),
        questions,
    }))
}
