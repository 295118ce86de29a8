use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use std::time::Duration;
use tracing::{debug, info};

use super::messages::{NotificationMessage, TranscriptionReply, TranscriptionRequest};
use crate::audio::AudioSegment;

pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, request_timeout: Duration) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::ConnectOptions::new()
            .request_timeout(Some(request_timeout))
            .connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Send one normalized segment to the STT worker and wait for its reply
    pub async fn request_transcription(
        &self,
        subject: &str,
        session_id: &str,
        sequence: u32,
        segment: &AudioSegment,
    ) -> Result<TranscriptionReply> {
        let message = TranscriptionRequest {
            session_id: session_id.to_string(),
            sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(segment.pcm_bytes()),
            sample_rate: segment.sample_rate,
            channels: segment.channels,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        let response = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .context("STT request failed")?;

        debug!(
            "STT reply on {} (session={}, sequence={}, bytes={})",
            subject,
            session_id,
            sequence,
            response.payload.len()
        );

        serde_json::from_slice(&response.payload).context("Failed to parse STT reply")
    }

    /// Publish a candidate notification request
    pub async fn publish_notification(
        &self,
        subject: &str,
        notification: &NotificationMessage,
    ) -> Result<()> {
        let payload = serde_json::to_vec(notification)?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .context("Failed to publish notification")?;

        info!(
            "Published {:?} notification for session {} to {}",
            notification.decision, notification.session_id, subject
        );

        Ok(())
    }
}
