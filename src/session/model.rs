use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::jobs::JobContext;

/// Lifecycle of an interview session.
///
/// `Invalid` is never stored; it names the outcome of a connection that
/// targets a session outside `PendingStart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    PendingStart,
    InProgress,
    Evaluating,
    Completed,
    Invalid,
    Aborted,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Aborted)
    }

    /// Statuses a final write may start from
    pub fn is_claimed(self) -> bool {
        matches!(self, SessionStatus::InProgress | SessionStatus::Evaluating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    AI,
    Candidate,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::AI => write!(f, "AI"),
            Speaker::Candidate => write!(f, "Candidate"),
        }
    }
}

/// One utterance of the interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    /// Position in the transcript, starting at 0
    pub index: usize,
}

/// Structured post-interview assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    /// Always within 0..=100
    pub score: u8,
}

impl Evaluation {
    /// Zero-score record used when the model's evaluation cannot be parsed
    pub fn degraded(reason: impl fmt::Display) -> Self {
        Self {
            summary: format!("Failed to parse evaluation from the language model: {}", reason),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            score: 0,
        }
    }
}

/// Ordered, append-only list of turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn with the next index and return a reference to it
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        let index = self.turns.len();
        self.turns.push(Turn {
            speaker,
            text: text.into(),
            index,
        });
        &self.turns[index]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of recorded candidate answers
    pub fn candidate_turns(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.speaker == Speaker::Candidate)
            .count()
    }

    /// Render as `Speaker: text` lines for prompts
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.speaker, t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Durable record of one candidate's automated interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: String,
    pub job_id: String,
    /// Opaque candidate identifier (e.g. contact address), only used for notifications
    pub candidate_ref: String,
    pub status: SessionStatus,
    /// Job context captured at shortlisting; read-only for the session's lifetime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobContext>,
    #[serde(default)]
    pub transcript: Transcript,
    #[serde(default)]
    pub turn_count: usize,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    /// New `PendingStart` session for a shortlisted candidate
    pub fn pending(job_id: impl Into<String>, candidate_ref: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job_id.into(),
            candidate_ref: candidate_ref.into(),
            status: SessionStatus::PendingStart,
            job: None,
            transcript: Transcript::new(),
            turn_count: 0,
            evaluation: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pending session carrying a snapshot of its job context
    pub fn for_job(job: &JobContext, candidate_ref: impl Into<String>) -> Self {
        Self {
            job: Some(job.clone()),
            ..Self::pending(job.id.clone(), candidate_ref)
        }
    }

    /// Persisted score; a session without evaluation counts as 0
    pub fn score(&self) -> u8 {
        self.evaluation.as_ref().map(|e| e.score).unwrap_or(0)
    }
}

/// Query for listing sessions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub job_id: Option<String>,
    pub candidate_ref: Option<String>,
    pub limit: Option<usize>,
}

impl SessionFilter {
    pub fn matches(&self, session: &InterviewSession) -> bool {
        self.status.map_or(true, |s| s == session.status)
            && self.job_id.as_ref().map_or(true, |j| *j == session.job_id)
            && self
                .candidate_ref
                .as_ref()
                .map_or(true, |c| *c == session.candidate_ref)
    }
}
