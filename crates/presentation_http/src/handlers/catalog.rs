//! Catalog handlers: home, subject detail and topic search

use axum::{
    Json,
    extract::{Path, Query},
};
use domain::{APP_NAME, ClassLevel, DomainError, Subject, Topic, catalog};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ApiError;

/// Home screen payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub app_name: &'static str,
    pub subjects: &'static [Subject],
    pub class_levels: [ClassLevel; 4],
}

/// Topics of one class level
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTopics {
    pub class_level: ClassLevel,
    pub topics: Vec<Topic>,
}

/// Subject page payload
#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub subject: &'static Subject,
    pub levels: Vec<ClassTopics>,
}

/// `?q=` search query
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results payload
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Topic>,
}

/// `GET /`
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        app_name: APP_NAME,
        subjects: catalog::subjects(),
        class_levels: ClassLevel::ALL,
    })
}

/// `GET /subject/{id}`
#[instrument]
pub async fn subject(Path(id): Path<String>) -> Result<Json<SubjectResponse>, ApiError> {
    let subject =
        catalog::resolve_subject(&id).ok_or_else(|| DomainError::not_found("Subject", &id))?;

    let levels = ClassLevel::ALL
        .into_iter()
        .map(|class_level| ClassTopics {
            class_level,
            topics: catalog::topics_for(subject.id, class_level),
        })
        .collect();

    Ok(Json(SubjectResponse { subject, levels }))
}

/// `GET /search?q=`
#[instrument(skip(query), fields(q = %query.q))]
pub async fn search(Query(query): Query<SearchQuery>) -> Json<SearchResponse> {
    let results = catalog::search(&query.q);
    debug!(hits = results.len(), "Topic search");
    Json(SearchResponse {
        query: query.q,
        results,
    })
}
