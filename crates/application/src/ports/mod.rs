//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod ai_gateway_port;
mod audio_output_port;
mod cache_port;

#[cfg(test)]
pub use ai_gateway_port::MockAiGatewayPort;
pub use ai_gateway_port::{AiGatewayPort, GeneratedNotes, NotesRequest, TextStream};
#[cfg(test)]
pub use audio_output_port::MockAudioOutputPort;
pub use audio_output_port::AudioOutputPort;
pub use cache_port::{CachePort, CachePortExt, CacheStats, StoredEntry, ttl};
