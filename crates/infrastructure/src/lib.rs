//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Gemini gateway,
//! the note cache backends, configuration loading and logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;

pub use adapters::{GeminiGatewayAdapter, UnconfiguredGateway, build_gateway};
pub use cache::{MokaCache, RedbCache, build_cache};
pub use config::{
    AppConfig, CacheAppConfig, CacheBackend, GeminiAppConfig, ServerConfig, TelemetryAppConfig,
};
pub use telemetry::{LogFormat, TelemetryError, init_cli_telemetry, init_telemetry};
