//! Types for speech synthesis

use std::fmt;

use domain::SpeechClip;
use serde::{Deserialize, Serialize};

/// Audio formats produced by the synthesis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Raw signed 16-bit little-endian PCM
    Pcm,
    /// WAV container
    Wav,
}

impl AudioFormat {
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Pcm => "audio/L16",
            Self::Wav => "audio/wav",
        }
    }

    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pcm => "pcm",
            Self::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Container for audio data with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
    duration_ms: Option<u64>,
    sample_rate: Option<u32>,
}

impl AudioData {
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            duration_ms: None,
            sample_rate: None,
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    #[must_use]
    pub const fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    #[must_use]
    pub const fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<AudioData> for SpeechClip {
    fn from(audio: AudioData) -> Self {
        let duration = audio.duration_ms.map(std::time::Duration::from_millis);
        Self::wav(audio.data, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_format_mime_types() {
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioFormat::Pcm.mime_type(), "audio/L16");
    }

    #[test]
    fn audio_data_builder() {
        let audio = AudioData::new(vec![0; 4], AudioFormat::Wav)
            .with_duration(1500)
            .with_sample_rate(24_000);
        assert_eq!(audio.duration_ms(), Some(1500));
        assert_eq!(audio.sample_rate(), Some(24_000));
        assert!(!audio.is_empty());
    }

    #[test]
    fn converts_into_speech_clip() {
        let clip: SpeechClip = AudioData::new(vec![1, 2], AudioFormat::Wav)
            .with_duration(250)
            .into();
        assert_eq!(clip.data, vec![1, 2]);
        assert_eq!(clip.duration, Some(std::time::Duration::from_millis(250)));
    }
}
