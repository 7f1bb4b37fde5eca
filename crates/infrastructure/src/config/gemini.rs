//! Gemini credential and model configuration.

use ai_core::GeminiConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// API key plus client settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GeminiAppConfig {
    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Endpoint, models, voice and timeout
    #[serde(flatten)]
    pub client: GeminiConfig,
}

impl std::fmt::Debug for GeminiAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAppConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("client", &self.client)
            .finish()
    }
}

impl GeminiAppConfig {
    /// Whether a non-blank key is present
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}
