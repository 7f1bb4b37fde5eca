//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod gemini_gateway_adapter;
pub mod prompts;
mod unconfigured_gateway;

use std::sync::Arc;

use application::{error::ApplicationError, ports::AiGatewayPort};
use tracing::warn;

pub use gemini_gateway_adapter::GeminiGatewayAdapter;
pub use unconfigured_gateway::UnconfiguredGateway;

use crate::config::GeminiAppConfig;

/// Build the AI gateway: Gemini when a key is configured, otherwise a
/// gateway that reports the missing key on every call
pub fn build_gateway(config: &GeminiAppConfig) -> Result<Arc<dyn AiGatewayPort>, ApplicationError> {
    match &config.api_key {
        Some(key) if config.has_api_key() => Ok(Arc::new(GeminiGatewayAdapter::new(
            config.client.clone(),
            key.clone(),
        )?)),
        _ => {
            warn!("No Gemini API key configured; AI features are disabled");
            Ok(Arc::new(UnconfiguredGateway))
        },
    }
}
