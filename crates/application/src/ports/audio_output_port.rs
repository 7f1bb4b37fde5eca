//! Audio output port - Interface to a playback device

use domain::SpeechClip;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A device that can play one clip at a time
#[cfg_attr(test, automock)]
pub trait AudioOutputPort: Send + Sync {
    /// Start playing a clip without blocking
    fn play(&self, clip: &SpeechClip) -> Result<(), ApplicationError>;

    /// Stop whatever is playing
    fn stop(&self);

    /// Whether audio is currently audible
    fn is_playing(&self) -> bool;
}
