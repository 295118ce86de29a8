use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};
use std::io::Cursor;
use tracing::debug;

/// Target format for the STT worker (Whisper expects 16kHz mono)
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// One candidate answer as 16-bit PCM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioSegment {
    /// Decode a client payload.
    ///
    /// RIFF/WAV payloads are read with their own header; anything else is
    /// taken as raw little-endian i16 PCM at the fallback rate and channel count.
    pub fn decode(bytes: &[u8], fallback_rate: u32, fallback_channels: u16) -> Result<Self> {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            return Self::from_wav(bytes);
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
            .collect();

        Ok(Self {
            samples,
            sample_rate: fallback_rate,
            channels: fallback_channels.max(1),
        })
    }

    fn from_wav(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Failed to read WAV header")?;
        let spec = reader.spec();

        let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader
                .into_samples::<i16>()
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read audio samples")?,
            (SampleFormat::Float, 32) => reader
                .into_samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read audio samples")?,
            (format, bits) => {
                anyhow::bail!("Unsupported WAV sample format: {:?} {}-bit", format, bits)
            }
        };

        debug!(
            "Decoded WAV answer: {}Hz, {} channels, {} samples",
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels.max(1) as f64)
    }

    /// Convert to 16kHz mono for the STT worker
    pub fn to_mono_16khz(self) -> Self {
        self.downmix().resample(TARGET_SAMPLE_RATE)
    }

    /// Nearest-sample resampling by the exact rate ratio
    fn resample(self, target_rate: u32) -> Self {
        if self.sample_rate == target_rate || self.sample_rate == 0 || target_rate == 0 {
            return self;
        }

        let src = self.sample_rate as u64;
        let dst = target_rate as u64;
        let len = (self.samples.len() as u64 * dst / src) as usize;
        let samples = (0..len as u64)
            .map(|i| self.samples[(i * src / dst) as usize])
            .collect();

        Self {
            samples,
            sample_rate: target_rate,
            channels: self.channels,
        }
    }

    /// Average every frame's channels into one sample
    fn downmix(self) -> Self {
        if self.channels <= 1 {
            return self;
        }

        let channels = self.channels as usize;
        let samples = self
            .samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect();

        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }

    /// Little-endian PCM bytes
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
