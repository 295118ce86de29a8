use std::time::Duration;
use thiserror::Error;

use crate::session::SessionStatus;

/// Failures of a single live interview.
///
/// Every variant is contained to the session that produced it. Only
/// [`InterviewError::SessionUnavailable`] and [`InterviewError::ClaimRace`]
/// leave the stored status untouched; everything else ends in `Aborted`.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// Unknown id, or the session is not `PendingStart`
    #[error("session {session_id} is not available")]
    SessionUnavailable { session_id: String },

    /// Another connection claimed the session between read and claim
    #[error("session {session_id} was claimed by another connection")]
    ClaimRace { session_id: String },

    #[error("job {0} not found")]
    JobNotFound(String),

    #[error("job lookup failed: {0:#}")]
    JobLookup(anyhow::Error),

    #[error("transcription failed: {0:#}")]
    Transcription(anyhow::Error),

    #[error("dialogue generation failed: {0:#}")]
    Generation(anyhow::Error),

    #[error("client disconnected")]
    ClientDisconnect,

    #[error("{step} timed out after {limit:?}")]
    Timeout { step: &'static str, limit: Duration },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InterviewError {
    /// Rejections happen before the claim and never change stored state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            InterviewError::SessionUnavailable { .. } | InterviewError::ClaimRace { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(String),

    #[error("session {0} already exists")]
    AlreadyExists(String),

    #[error("session {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: String,
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The evaluation response could not be turned into an [`Evaluation`](crate::session::Evaluation).
///
/// Non-fatal: the engine records a degraded evaluation instead.
#[derive(Debug, Error)]
pub enum EvaluationParseError {
    #[error("evaluation response is empty")]
    Empty,

    #[error("evaluation response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("evaluation score {0} is outside 0..=100")]
    ScoreOutOfRange(i64),
}
