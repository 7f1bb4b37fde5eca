//! Synthesized narration audio

use std::time::Duration;

/// Container format of a speech clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioContainer {
    Wav,
}

impl AudioContainer {
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
        }
    }
}

/// Playable narration audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechClip {
    pub data: Vec<u8>,
    pub container: AudioContainer,
    pub duration: Option<Duration>,
}

impl SpeechClip {
    pub fn wav(data: Vec<u8>, duration: Option<Duration>) -> Self {
        Self {
            data,
            container: AudioContainer::Wav,
            duration,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_clip_has_mime_type() {
        let clip = SpeechClip::wav(vec![1, 2, 3], None);
        assert_eq!(clip.container.mime_type(), "audio/wav");
        assert_eq!(clip.len(), 3);
        assert!(!clip.is_empty());
    }
}
