//! PCM to WAV conversion
//!
//! The TTS model returns bare 16-bit PCM described only by its MIME type
//! (`audio/L16;codec=pcm;rate=24000`). Players need a container, so the
//! samples are wrapped into WAV with hound.

use std::io::Cursor;

use tracing::{debug, instrument};

use crate::{
    error::SpeechError,
    types::{AudioData, AudioFormat},
};

/// Sample rate assumed when the MIME type does not state one
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Layout of a raw PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for PcmSpec {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
        }
    }
}

impl PcmSpec {
    /// Read `rate=` and `channels=` parameters from a MIME type
    pub fn from_mime_type(mime: &str) -> Self {
        let mut spec = Self::default();
        for param in mime.split(';').skip(1) {
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "rate" => {
                    if let Ok(rate) = value.trim().parse() {
                        spec.sample_rate = rate;
                    }
                },
                "channels" => {
                    if let Ok(channels) = value.trim().parse() {
                        spec.channels = channels;
                    }
                },
                _ => {},
            }
        }
        spec
    }
}

/// Wrap little-endian signed 16-bit PCM into a WAV container
#[instrument(skip(pcm), fields(pcm_len = pcm.len()))]
pub fn pcm_to_wav(pcm: &[u8], spec: PcmSpec) -> Result<AudioData, SpeechError> {
    if pcm.len() % 2 != 0 {
        return Err(SpeechError::InvalidAudio(format!(
            "PCM payload has odd length {}",
            pcm.len()
        )));
    }
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(SpeechError::InvalidAudio(format!("invalid PCM spec {spec:?}")));
    }

    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Vec::with_capacity(pcm.len() + 44);
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buffer), wav_spec)?;
        for sample in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
        }
        writer.finalize()?;
    }

    let frames = (pcm.len() / 2) as u64 / u64::from(spec.channels);
    let duration_ms = frames * 1000 / u64::from(spec.sample_rate);

    debug!(wav_len = buffer.len(), duration_ms, "Wrapped PCM into WAV");

    Ok(AudioData::new(buffer, AudioFormat::Wav)
        .with_duration(duration_ms)
        .with_sample_rate(spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rate_from_mime() {
        let spec = PcmSpec::from_mime_type("audio/L16;codec=pcm;rate=16000");
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.channels, 1);
    }

    #[test]
    fn defaults_when_rate_missing() {
        let spec = PcmSpec::from_mime_type("audio/L16");
        assert_eq!(spec, PcmSpec::default());
    }

    #[test]
    fn wraps_one_second_of_silence() {
        let pcm = vec![0u8; 24_000 * 2];
        let wav = pcm_to_wav(&pcm, PcmSpec::default()).unwrap();

        assert_eq!(wav.format(), AudioFormat::Wav);
        assert_eq!(wav.duration_ms(), Some(1000));
        assert_eq!(&wav.data()[..4], b"RIFF");
        assert_eq!(&wav.data()[8..12], b"WAVE");
        assert_eq!(wav.data().len(), pcm.len() + 44);
    }

    #[test]
    fn wav_is_readable_back() {
        let samples: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let wav = pcm_to_wav(&pcm, PcmSpec::default()).unwrap();

        let reader = hound::WavReader::new(Cursor::new(wav.into_data())).unwrap();
        assert_eq!(reader.spec().sample_rate, DEFAULT_SAMPLE_RATE);
        let decoded: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn odd_length_is_rejected() {
        assert!(matches!(
            pcm_to_wav(&[0, 1, 2], PcmSpec::default()),
            Err(SpeechError::InvalidAudio(_))
        ));
    }
}
