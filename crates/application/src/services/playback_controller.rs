//! Playback controller - At most one clip audible at a time

use domain::SpeechClip;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::{error::ApplicationError, ports::AudioOutputPort};

/// Serializes playback on a single output device
#[derive(Debug)]
pub struct PlaybackController<O> {
    output: O,
    active: Mutex<bool>,
}

impl<O: AudioOutputPort> PlaybackController<O> {
    pub const fn new(output: O) -> Self {
        Self {
            output,
            active: Mutex::new(false),
        }
    }

    /// Start `clip`, stopping any clip already playing
    #[instrument(skip(self, clip), fields(bytes = clip.len()))]
    pub fn play(&self, clip: &SpeechClip) -> Result<(), ApplicationError> {
        let mut active = self.active.lock();
        if *active {
            debug!("Stopping previous clip");
            self.output.stop();
            *active = false;
        }
        self.output.play(clip)?;
        *active = true;
        Ok(())
    }

    /// Stop playback; a no-op when nothing is playing
    pub fn stop(&self) {
        let mut active = self.active.lock();
        if *active {
            self.output.stop();
            *active = false;
        }
    }

    pub fn is_playing(&self) -> bool {
        let active = self.active.lock();
        *active && self.output.is_playing()
    }

    pub const fn output(&self) -> &O {
        &self.output
    }
}
