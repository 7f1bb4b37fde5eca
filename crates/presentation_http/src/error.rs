//! API error responses
//!
//! Every failure becomes a JSON body `{error, code, details?}`. Release builds
//! hide upstream and storage messages; they stay in the logs.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

/// Fragments that mark a message as unfit for clients
const SENSITIVE_FRAGMENTS: [&str; 12] = [
    "/home/",
    "/users/",
    "/var/",
    "/etc/",
    "c:\\",
    "googleapis.com",
    "x-goog-api-key",
    "redb",
    "backtrace",
    "panicked",
    ".rs:",
    "timed out",
];

/// Whether internal error details may appear in response bodies.
///
/// The server turns this off in release builds.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn exposing() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Pass `msg` through unless it looks like it carries paths, URLs or traces
fn client_safe(msg: &str) -> String {
    if exposing() {
        return msg.to_string();
    }
    let lower = msg.to_lowercase();
    let leaky = lower.contains("://")
        || SENSITIVE_FRAGMENTS
            .iter()
            .any(|fragment| lower.contains(fragment));
    if leaky {
        GENERIC_MESSAGE.to_string()
    } else {
        msg.to_string()
    }
}

/// Failure of an HTTP request
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path, query or body
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The AI service asked us to slow down
    #[error("Rate limited")]
    RateLimited,

    /// The AI service is unreachable, unconfigured or returned nothing usable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable code, e.g. `not_found`
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }

    fn body(&self) -> ErrorResponse {
        let (error, details) = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => (client_safe(msg), None),
            Self::RateLimited => ("Too many requests, please try again shortly".to_string(), None),
            Self::ServiceUnavailable(msg) if exposing() => (msg.clone(), None),
            Self::ServiceUnavailable(_) => ("Service temporarily unavailable".to_string(), None),
            Self::Internal(msg) => (
                "An internal error occurred".to_string(),
                exposing().then(|| msg.clone()),
            ),
        };
        ErrorResponse {
            error,
            code: self.code().to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::InvalidClassLevel(_)
            | DomainError::InvalidDetailLevel(_)
            | DomainError::InvalidNoteKey(_)
            | DomainError::ValidationError(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => e.into(),
            ApplicationError::RateLimited => Self::RateLimited,
            ApplicationError::NotConfigured(msg)
            | ApplicationError::Connection(msg)
            | ApplicationError::Generation(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::Cache(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_line_up() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "bad_request"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), code);
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn body_omits_missing_details() {
        let json = serde_json::to_value(ApiError::NotFound("Subject".into()).body()).unwrap();
        assert_eq!(json["code"], "not_found");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn domain_not_found_maps_to_404() {
        let err: ApiError = DomainError::not_found("Subject", "astronomy").into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn invalid_class_level_maps_to_bad_request() {
        let err: ApiError =
            ApplicationError::Domain(DomainError::InvalidClassLevel("S9".into())).into();
        let ApiError::BadRequest(msg) = err else {
            unreachable!("Expected BadRequest");
        };
        assert!(msg.contains("S9"));
    }

    #[test]
    fn upstream_failures_map_to_service_unavailable() {
        for source in [
            ApplicationError::NotConfigured("api key".into()),
            ApplicationError::Connection("reset".into()),
            ApplicationError::Generation("empty".into()),
        ] {
            let err: ApiError = source.into();
            assert!(matches!(err, ApiError::ServiceUnavailable(_)));
        }
    }

    #[test]
    fn storage_failures_map_to_internal() {
        let err: ApiError = ApplicationError::Cache("disk full".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
        let err: ApiError = ApplicationError::RateLimited.into();
        assert!(matches!(err, ApiError::RateLimited));
    }

    // Single test so the global flag is never flipped by a concurrent test
    #[test]
    fn client_safe_depends_on_exposure_flag() {
        set_expose_internal_errors(false);
        assert_eq!(client_safe("Failed to open /var/lib/pearl/cache.redb"), GENERIC_MESSAGE);
        assert_eq!(client_safe("POST https://example.org/models failed"), GENERIC_MESSAGE);
        assert_eq!(client_safe("Invalid class level: S9"), "Invalid class level: S9");
        let hidden = ApiError::Internal("redb: corrupted page".into()).body();
        assert!(hidden.details.is_none());

        set_expose_internal_errors(true);
        let msg = "Error at /home/user/config.toml";
        assert_eq!(client_safe(msg), msg);
        let shown = ApiError::Internal("redb: corrupted page".into()).body();
        assert_eq!(shown.details.as_deref(), Some("redb: corrupted page"));
    }
}
