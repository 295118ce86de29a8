use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::audio::AudioSegment;
use crate::config::SttConfig;
use crate::nats::NatsClient;

/// Speech-to-text for one candidate answer.
///
/// Stateless; called once per turn and awaited before the turn continues.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio payload. Empty or silent input yields `""`.
    async fn transcribe(&self, session_id: &str, sequence: u32, audio: &[u8]) -> Result<String>;
}

/// Transcriber backed by the Whisper worker reachable over NATS request/reply
pub struct NatsTranscriber {
    nats: NatsClient,
    config: SttConfig,
}

impl NatsTranscriber {
    pub fn new(nats: NatsClient, config: SttConfig) -> Self {
        Self { nats, config }
    }
}

#[async_trait]
impl Transcriber for NatsTranscriber {
    async fn transcribe(&self, session_id: &str, sequence: u32, audio: &[u8]) -> Result<String> {
        let segment = AudioSegment::decode(audio, self.config.sample_rate, self.config.channels)?
            .to_mono_16khz();

        if segment.is_empty() {
            debug!("Session {} answer {} is empty, skipping STT", session_id, sequence);
            return Ok(String::new());
        }

        info!(
            "Transcribing answer {} for session {} ({:.1}s)",
            sequence,
            session_id,
            segment.duration_seconds()
        );

        let reply = self
            .nats
            .request_transcription(&self.config.subject, session_id, sequence, &segment)
            .await?;

        if let Some(error) = reply.error {
            anyhow::bail!("STT worker error: {}", error);
        }

        Ok(reply.text.trim().to_string())
    }
}
