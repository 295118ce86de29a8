use serde::{Deserialize, Serialize};

use crate::decision::Decision;

/// Transcription request sent to the STT worker (request/reply)
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    pub session_id: String,
    /// Candidate answer number within the session, starting at 0
    pub sequence: u32,
    pub pcm: String, // Base64-encoded PCM bytes
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String, // RFC3339 timestamp
}

/// Reply from the STT worker
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionReply {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Set by the worker when it could not transcribe the segment
    #[serde(default)]
    pub error: Option<String>,
}

/// Candidate notification request published for the mailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub session_id: String,
    pub candidate_ref: String,
    pub job_id: String,
    pub decision: Decision,
    pub score: u8,
    pub timestamp: String,
}
