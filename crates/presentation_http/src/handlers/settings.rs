//! Settings handlers: about info and saved notes

use application::CacheStats;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::{APP_NAME, SavedNoteSummary};
use serde::Serialize;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Release shown on the about card
pub const ABOUT_VERSION: &str = "1.0.0";

pub const ABOUT_TEXT: &str = "Pearl Notes is an educational tool designed specifically for \
Uganda's New Lower Secondary Curriculum (NCDC). We help students access syllabus-aligned notes, \
revision materials, and AI assistance instantly.";

#[derive(Debug, Serialize)]
pub struct AboutInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

/// Settings screen payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub about: AboutInfo,
    pub saved_notes: Vec<SavedNoteSummary>,
    pub cache: CacheStats,
}

/// `GET /settings`
#[instrument(skip(state))]
pub async fn settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>, ApiError> {
    let saved_notes = state.notes.saved_notes().await?;

    Ok(Json(SettingsResponse {
        about: AboutInfo {
            name: APP_NAME,
            version: ABOUT_VERSION,
            description: ABOUT_TEXT,
        },
        saved_notes,
        cache: state.notes.cache_stats(),
    }))
}

/// `DELETE /settings/saved-notes/{key}`
#[instrument(skip(state))]
pub async fn delete_saved_note(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete_saved(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
