//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `gemini`: AI credential and model selection
//! - `cache`: Note cache backend and bounds
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml`, then `PEARL_*` environment variables (`__` separates
//! nested keys, e.g. `PEARL_SERVER__PORT=8080`).

mod cache;
mod gemini;
mod server;

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cache::{CacheAppConfig, CacheBackend};
pub use gemini::GeminiAppConfig;
pub use server::ServerConfig;

/// Environment variables consulted, in order, when no key is configured
pub const API_KEY_FALLBACK_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "pearl_notes=info,presentation_http=info,application=info,infrastructure=info,tower_http=info"
        .to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiAppConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `config.toml` when given
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PEARL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_key_fallback(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Fill in the API key from the fallback variables when none is configured
    pub fn apply_key_fallback(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.gemini.has_api_key() {
            return;
        }
        self.gemini.api_key = API_KEY_FALLBACK_VARS.iter().find_map(|name| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| {
                    debug!(source = *name, "Using API key from fallback variable");
                    SecretString::from(value)
                })
        });
    }
}
