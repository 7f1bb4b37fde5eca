//! Speaker output backed by rodio

use std::io::Cursor;

use application::{AudioOutputPort, ApplicationError};
use domain::SpeechClip;
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

/// Plays clips on the default output device, one sink per clip
pub struct RodioOutput {
    handle: OutputStreamHandle,
    sink: Mutex<Option<Sink>>,
}

impl std::fmt::Debug for RodioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioOutput")
            .field("active", &self.sink.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl RodioOutput {
    /// Open the default device.
    ///
    /// The returned stream must outlive the output; dropping it silences the
    /// device.
    pub fn open() -> Result<(OutputStream, Self), ApplicationError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| ApplicationError::Internal(format!("no audio device: {e}")))?;
        Ok((
            stream,
            Self {
                handle,
                sink: Mutex::new(None),
            },
        ))
    }
}

impl AudioOutputPort for RodioOutput {
    fn play(&self, clip: &SpeechClip) -> Result<(), ApplicationError> {
        let source = Decoder::new(Cursor::new(clip.data.clone()))
            .map_err(|e| ApplicationError::Internal(format!("undecodable audio: {e}")))?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| ApplicationError::Internal(format!("audio sink: {e}")))?;
        sink.append(source);

        if let Some(previous) = self.sink.lock().replace(sink) {
            previous.stop();
        }
        debug!(bytes = clip.len(), "Playback started");
        Ok(())
    }

    fn stop(&self) {
        if let Some(sink) = self.sink.lock().take() {
            sink.stop();
            debug!("Playback stopped");
        }
    }

    fn is_playing(&self) -> bool {
        self.sink.lock().as_ref().is_some_and(|sink| !sink.empty())
    }
}
