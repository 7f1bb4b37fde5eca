//! Gemini client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::streaming::create_stream;
use crate::{
    config::GeminiConfig,
    error::GenerationError,
    ports::{GenerativeEngine, StreamingResponse},
    types::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for Gemini and Imagen models
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    api_key: SecretString,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.config.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GenerationError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            text_model = %config.text_model,
            "Initialized Gemini client"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub const fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build the URL for a model method, e.g. `models/gemini-2.5-flash:generateContent`
    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        url: String,
        body: &B,
    ) -> Result<Response, GenerationError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Map a non-success response to an error, using the API's message when present
async fn error_from_response(response: Response) -> GenerationError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| match b.error.status {
            Some(s) => format!("{s}: {}", b.error.message),
            None => b.error.message,
        })
        .unwrap_or(body);

    warn!(status = %status, message = %message, "Gemini request failed");

    match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GenerationError::Timeout,
        s if s.is_server_error() => {
            GenerationError::ServerError(format!("Status {s}: {message}"))
        },
        s => GenerationError::RequestFailed(format!("Status {s}: {message}")),
    }
}

#[async_trait]
impl GenerativeEngine for GeminiClient {
    #[instrument(skip(self, request))]
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        debug!("Sending generateContent request");

        let response = self
            .post_json(self.model_url(model, "generateContent"), &request)
            .await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(GenerationError::Blocked(reason.to_string()));
        }

        debug!(
            candidates = parsed.candidates.len(),
            finish_reason = ?parsed.finish_reason(),
            "generateContent completed"
        );

        Ok(parsed)
    }

    #[instrument(skip(self, request))]
    async fn generate_content_stream(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<StreamingResponse, GenerationError> {
        debug!("Starting streamGenerateContent request");

        let url = format!("{}?alt=sse", self.model_url(model, "streamGenerateContent"));
        let response = self.post_json(url, &request).await?;

        Ok(create_stream(response))
    }

    #[instrument(skip(self, request))]
    async fn generate_images(
        &self,
        model: &str,
        request: PredictRequest,
    ) -> Result<PredictResponse, GenerationError> {
        debug!("Sending predict request");

        let response = self.post_json(self.model_url(model, "predict"), &request).await?;

        response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}
