//! Application layer - Use cases and orchestration
//!
//! Contains the note composer, quiz, narration, chat and playback services
//! together with the ports they depend on. Orchestrates domain objects and
//! infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;

#[cfg(test)]
mod test_support;
