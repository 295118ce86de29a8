// Shared fakes for engine and HTTP integration tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use prashna_interviews::dialogue::parse_evaluation;
use prashna_interviews::dialogue::EvaluationResult;
use prashna_interviews::{
    ClientMessage, Decision, DecisionTrigger, DialogueGenerator, EngineConfig, Evaluation,
    InMemoryJobCatalog, InMemorySessionStore, InterviewConnection, InterviewEngine,
    InterviewSession, JobCatalog, JobContext, NotificationMessage, Notifier, ServerMessage,
    SessionFilter, SessionStatus, SessionStore, StoreError, Transcriber, Transcript,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What happens to outbound messages past a given count
#[derive(Clone, Copy)]
pub enum SendFault {
    Fail,
    Stall,
}

/// Connection replaying a fixed script of client messages
pub struct ScriptedConnection {
    script: VecDeque<ClientMessage>,
    /// Keep the connection open (silent) once the script runs out
    hold_open: bool,
    send_fault: Option<(usize, SendFault)>,
    pub sent: Vec<ServerMessage>,
    pub closed: bool,
}

impl ScriptedConnection {
    pub fn new(script: Vec<ClientMessage>) -> Self {
        Self {
            script: script.into(),
            hold_open: false,
            send_fault: None,
            sent: Vec::new(),
            closed: false,
        }
    }

    /// `count` audio answers, then the client goes away
    pub fn answering(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| ClientMessage::Audio(vec![i as u8; 64]))
                .collect(),
        )
    }

    /// Never sends anything and never disconnects
    pub fn silent() -> Self {
        Self {
            hold_open: true,
            ..Self::new(Vec::new())
        }
    }

    /// The first `delivered` messages go through; later sends hit `fault`
    pub fn with_send_fault(mut self, delivered: usize, fault: SendFault) -> Self {
        self.send_fault = Some((delivered, fault));
        self
    }

    pub fn questions(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter(|m| matches!(m, ServerMessage::Question { .. }))
            .map(|m| m.text())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter(|m| matches!(m, ServerMessage::Error { .. }))
            .map(|m| m.text())
            .collect()
    }
}

#[async_trait]
impl InterviewConnection for ScriptedConnection {
    async fn send(&mut self, message: ServerMessage) -> Result<()> {
        if self.closed {
            bail!("connection closed");
        }
        match self.send_fault {
            Some((delivered, SendFault::Fail)) if self.sent.len() >= delivered => {
                bail!("peer went away")
            }
            Some((delivered, SendFault::Stall)) if self.sent.len() >= delivered => {
                std::future::pending::<()>().await
            }
            _ => {}
        }
        self.sent.push(message);
        Ok(())
    }

    async fn recv(&mut self) -> Option<ClientMessage> {
        match self.script.pop_front() {
            Some(message) => Some(message),
            None if self.hold_open => std::future::pending().await,
            None => None,
        }
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

/// Returns "answer N" for answer N; optionally fails at one sequence number
#[derive(Default)]
pub struct CannedTranscriber {
    pub fail_at: Option<u32>,
}

#[async_trait]
impl Transcriber for CannedTranscriber {
    async fn transcribe(&self, _session_id: &str, sequence: u32, _audio: &[u8]) -> Result<String> {
        if self.fail_at == Some(sequence) {
            bail!("stt worker unavailable");
        }
        Ok(format!("answer {}", sequence + 1))
    }
}

/// Accepts the audio and never answers
pub struct StalledTranscriber;

#[async_trait]
impl Transcriber for StalledTranscriber {
    async fn transcribe(&self, _session_id: &str, _sequence: u32, _audio: &[u8]) -> Result<String> {
        std::future::pending().await
    }
}

pub enum QuestionScript {
    Ask,
    Fail,
    Stall,
}

pub enum EvaluationScript {
    Score(u8),
    /// Model output that does not parse
    Garbage,
    /// Backend call fails
    Fail,
    /// Backend never answers
    Stall,
}

/// Numbered questions and a scripted evaluation
pub struct CannedDialogue {
    pub evaluation: EvaluationScript,
    pub next_question: QuestionScript,
}

impl CannedDialogue {
    pub fn scoring(score: u8) -> Self {
        Self {
            evaluation: EvaluationScript::Score(score),
            next_question: QuestionScript::Ask,
        }
    }

    pub fn evaluating(evaluation: EvaluationScript) -> Self {
        Self {
            evaluation,
            next_question: QuestionScript::Ask,
        }
    }

    pub fn asking(next_question: QuestionScript) -> Self {
        Self {
            evaluation: EvaluationScript::Score(80),
            next_question,
        }
    }
}

#[async_trait]
impl DialogueGenerator for CannedDialogue {
    async fn opening_question(&self, job: &JobContext) -> Result<String> {
        Ok(format!("Question 1 about {}", job.title))
    }

    async fn next_question(&self, transcript: &Transcript, _job: &JobContext) -> Result<String> {
        match self.next_question {
            QuestionScript::Ask => Ok(format!("Question {}", transcript.candidate_turns() + 1)),
            QuestionScript::Fail => bail!("rate limited"),
            QuestionScript::Stall => std::future::pending().await,
        }
    }

    async fn evaluate(&self, transcript: &Transcript, _job: &JobContext) -> Result<EvaluationResult> {
        match self.evaluation {
            EvaluationScript::Score(score) => Ok(Ok(Evaluation {
                summary: format!("{} turns reviewed", transcript.len()),
                strengths: vec!["clear answers".to_string()],
                weaknesses: Vec::new(),
                score,
            })),
            EvaluationScript::Garbage => Ok(parse_evaluation("I think they did well!")),
            EvaluationScript::Fail => bail!("model overloaded"),
            EvaluationScript::Stall => std::future::pending().await,
        }
    }
}

/// Records every session id it is triggered for
pub struct RecordingTrigger {
    tx: mpsc::UnboundedSender<String>,
}

impl RecordingTrigger {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DecisionTrigger for RecordingTrigger {
    async fn trigger(&self, session_id: &str) -> Result<Decision> {
        let _ = self.tx.send(session_id.to_string());
        Ok(Decision::Proceed)
    }
}

/// Captures notification requests instead of delivering them
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<NotificationMessage>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &NotificationMessage) -> Result<()> {
        let _ = self.tx.send(notification.clone());
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub enum StoreFault {
    /// The claim commits, then the call reports an I/O error
    ErrorAfterClaim,
    /// Writing a `Completed` record never finishes
    StallCompletedWrite,
    /// Lookups yield to the scheduler before returning
    YieldAfterGet,
}

/// In-memory store with one injected fault; counts claim attempts
pub struct FaultyStore {
    inner: InMemorySessionStore,
    fault: StoreFault,
    pub claim_attempts: AtomicUsize,
}

impl FaultyStore {
    pub fn new(fault: StoreFault) -> Self {
        Self {
            inner: InMemorySessionStore::new(),
            fault,
            claim_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionStore for FaultyStore {
    async fn insert(&self, session: InterviewSession) -> Result<(), StoreError> {
        self.inner.insert(session).await
    }

    async fn get(&self, id: &str) -> Result<Option<InterviewSession>, StoreError> {
        let session = self.inner.get(id).await;
        if let StoreFault::YieldAfterGet = self.fault {
            tokio::task::yield_now().await;
        }
        session
    }

    async fn compare_and_set_status(
        &self,
        id: &str,
        expected: SessionStatus,
        next: SessionStatus,
    ) -> Result<bool, StoreError> {
        let is_claim = expected == SessionStatus::PendingStart;
        if is_claim {
            self.claim_attempts.fetch_add(1, Ordering::SeqCst);
        }
        let moved = self.inner.compare_and_set_status(id, expected, next).await?;
        match self.fault {
            StoreFault::ErrorAfterClaim if is_claim => Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "fsync failed",
            ))),
            _ => Ok(moved),
        }
    }

    async fn persist_final(
        &self,
        id: &str,
        transcript: &Transcript,
        evaluation: Option<&Evaluation>,
        status: SessionStatus,
    ) -> Result<(), StoreError> {
        if let (StoreFault::StallCompletedWrite, SessionStatus::Completed) = (self.fault, status) {
            std::future::pending::<()>().await;
        }
        self.inner.persist_final(id, transcript, evaluation, status).await
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<InterviewSession>, StoreError> {
        self.inner.list(filter).await
    }
}

pub struct Harness {
    pub store: Arc<dyn SessionStore>,
    pub jobs: Arc<dyn JobCatalog>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemorySessionStore::new()))
    }

    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            jobs: Arc::new(InMemoryJobCatalog::new()),
        }
    }

    /// Register a job and a pending session for it; returns the session id
    pub async fn pending_session(&self) -> Result<String> {
        let job = JobContext::new(
            "Backend Engineer",
            vec!["Rust".to_string(), "PostgreSQL".to_string()],
        );
        let job_id = job.id.clone();
        self.jobs.insert(job).await?;

        let session = InterviewSession::pending(job_id, "candidate@example.com");
        let id = session.id.clone();
        self.store.insert(session).await?;
        Ok(id)
    }

    pub fn engine(
        &self,
        transcriber: impl Transcriber + 'static,
        dialogue: impl DialogueGenerator + 'static,
        decision: Arc<dyn DecisionTrigger>,
    ) -> InterviewEngine {
        InterviewEngine::new(
            self.store.clone(),
            self.jobs.clone(),
            Arc::new(transcriber),
            Arc::new(dialogue),
            decision,
            EngineConfig::default(),
        )
    }

    pub async fn session(&self, id: &str) -> Result<InterviewSession> {
        match self.store.get(id).await? {
            Some(session) => Ok(session),
            None => bail!("session {} missing", id),
        }
    }
}
