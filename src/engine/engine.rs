use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::connection::InterviewConnection;
use super::messages::{ClientMessage, ServerMessage};
use crate::config::{InterviewConfig, TimeoutConfig};
use crate::decision::DecisionTrigger;
use crate::dialogue::DialogueGenerator;
use crate::error::{InterviewError, StoreError};
use crate::jobs::{JobCatalog, JobContext};
use crate::session::{Evaluation, InterviewSession, SessionStatus, SessionStore, Speaker, Transcript};
use crate::transcription::Transcriber;

const UNAVAILABLE_NOTICE: &str = "This interview link is invalid or has already been used.";
const EVALUATING_NOTICE: &str =
    "Thank you. The interview is now complete. Please wait while I evaluate your answers...";
const THANK_YOU_NOTICE: &str =
    "Evaluation complete. Thank you for your time. The hiring team will be in touch via email.";
const NO_ANSWER_NOTICE: &str = "No answer was received in time. The interview has ended.";
const TRANSCRIPTION_NOTICE: &str = "We could not process your answer. The interview has ended.";
const CRITICAL_NOTICE: &str = "A critical server error occurred. The interview has ended.";

/// Engine settings taken from the service configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_turns: usize,
    pub timeouts: TimeoutConfig,
}

impl EngineConfig {
    pub fn new(interview: &InterviewConfig, timeouts: &TimeoutConfig) -> Self {
        Self {
            max_turns: interview.max_turns.max(1),
            timeouts: timeouts.clone(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(&InterviewConfig::default(), &TimeoutConfig::default())
    }
}

/// How a connection's session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Evaluation persisted and the decision trigger invoked
    Completed(Evaluation),
    /// Session was unknown, already used, or claimed by another connection
    Rejected,
    /// Claimed session ended early; stored as `Aborted`
    Aborted(String),
}

/// In-memory working copy of the claimed session
struct LiveSession {
    id: String,
    job_id: String,
    /// Snapshot taken at shortlisting; the catalog is consulted only without one
    job: Option<JobContext>,
    transcript: Transcript,
}

/// Runs one interview per connection.
///
/// Shared across connections; holds no per-session state of its own.
pub struct InterviewEngine {
    store: Arc<dyn SessionStore>,
    jobs: Arc<dyn JobCatalog>,
    transcriber: Arc<dyn Transcriber>,
    dialogue: Arc<dyn DialogueGenerator>,
    decision: Arc<dyn DecisionTrigger>,
    config: EngineConfig,
}

async fn bounded<T, F>(step: &'static str, limit: Duration, fut: F) -> Result<T, InterviewError>
where
    F: Future<Output = Result<T, InterviewError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(InterviewError::Timeout { step, limit }),
    }
}

fn notice_for(error: &InterviewError) -> &'static str {
    match error {
        InterviewError::SessionUnavailable { .. } | InterviewError::ClaimRace { .. } => {
            UNAVAILABLE_NOTICE
        }
        InterviewError::Timeout {
            step: "answer", ..
        } => NO_ANSWER_NOTICE,
        InterviewError::Transcription(_) => TRANSCRIPTION_NOTICE,
        InterviewError::JobNotFound(_)
        | InterviewError::JobLookup(_)
        | InterviewError::Generation(_)
        | InterviewError::ClientDisconnect
        | InterviewError::Timeout { .. }
        | InterviewError::Store(_) => CRITICAL_NOTICE,
    }
}

impl InterviewEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        jobs: Arc<dyn JobCatalog>,
        transcriber: Arc<dyn Transcriber>,
        dialogue: Arc<dyn DialogueGenerator>,
        decision: Arc<dyn DecisionTrigger>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            jobs,
            transcriber,
            dialogue,
            decision,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drive the full lifecycle of one connection targeting `session_id`.
    ///
    /// Always closes the connection before returning.
    pub async fn run<C: InterviewConnection>(&self, session_id: &str, conn: &mut C) -> SessionOutcome {
        info!("Interview connection opened for session {}", session_id);

        let session = match self.claim(session_id).await {
            Ok(session) => session,
            Err(e) => return self.reject(session_id, conn, e).await,
        };

        let mut live = LiveSession {
            id: session.id,
            job_id: session.job_id,
            job: session.job,
            transcript: Transcript::new(),
        };

        match self.conduct(&mut live, conn).await {
            Ok(evaluation) => {
                // Completion is already durable; the closing notice is best-effort
                if let Err(e) = self.send(conn, ServerMessage::thank_you(THANK_YOU_NOTICE)).await {
                    debug!("Session {}: thank-you notice not delivered: {}", live.id, e);
                }
                conn.close().await;
                info!(
                    "Interview {} completed with score {}",
                    live.id, evaluation.score
                );
                SessionOutcome::Completed(evaluation)
            }
            Err(e) => self.abort(&live, conn, e).await,
        }
    }

    /// Atomically move the session from `PendingStart` to `InProgress`
    async fn claim(&self, session_id: &str) -> Result<InterviewSession, InterviewError> {
        let store_limit = self.config.timeouts.store();

        let session = bounded("session lookup", store_limit, async {
            self.store.get(session_id).await.map_err(InterviewError::from)
        })
        .await?
        .ok_or_else(|| InterviewError::SessionUnavailable {
            session_id: session_id.to_string(),
        })?;

        if session.status != SessionStatus::PendingStart {
            warn!(
                "Session {} rejected: status is {:?}",
                session_id, session.status
            );
            return Err(InterviewError::SessionUnavailable {
                session_id: session_id.to_string(),
            });
        }

        let claimed = match bounded("session claim", store_limit, async {
            self.store
                .compare_and_set_status(
                    session_id,
                    SessionStatus::PendingStart,
                    SessionStatus::InProgress,
                )
                .await
                .map_err(InterviewError::from)
        })
        .await
        {
            Ok(claimed) => claimed,
            Err(e) => {
                self.burn_unconfirmed_claim(session_id).await;
                return Err(e);
            }
        };

        if !claimed {
            return Err(InterviewError::ClaimRace {
                session_id: session_id.to_string(),
            });
        }

        info!("Session {} claimed (job {})", session_id, session.job_id);
        Ok(session)
    }

    /// The claim may have committed before its store call failed or timed
    /// out; mark it `Aborted` so it cannot stay `InProgress`. A claim that
    /// never committed is still `PendingStart` and the write is refused.
    async fn burn_unconfirmed_claim(&self, session_id: &str) {
        let write = bounded("abort write", self.config.timeouts.store(), async {
            self.store
                .persist_final(session_id, &Transcript::new(), None, SessionStatus::Aborted)
                .await
                .map_err(InterviewError::from)
        })
        .await;
        match write {
            Ok(()) => warn!("Session {} aborted after an unconfirmed claim", session_id),
            Err(e) => debug!("Session {} left as is after failed claim: {}", session_id, e),
        }
    }

    /// Opening question, turn loop, evaluation and final write
    async fn conduct<C: InterviewConnection>(
        &self,
        live: &mut LiveSession,
        conn: &mut C,
    ) -> Result<Evaluation, InterviewError> {
        let timeouts = &self.config.timeouts;
        let job = match live.job.clone() {
            Some(job) => job,
            None => self.load_job(&live.job_id).await?,
        };

        let opening = bounded("opening question", timeouts.generation(), async {
            self.dialogue
                .opening_question(&job)
                .await
                .map_err(InterviewError::Generation)
        })
        .await?;
        live.transcript.push(Speaker::AI, opening.clone());
        self.send(conn, ServerMessage::question(opening)).await?;

        for turn in 0..self.config.max_turns {
            let audio = self.receive_answer(conn).await?;

            let text = bounded("transcription", timeouts.transcription(), async {
                self.transcriber
                    .transcribe(&live.id, turn as u32, &audio)
                    .await
                    .map_err(InterviewError::Transcription)
            })
            .await?;
            info!("Session {} answer {}: {}", live.id, turn + 1, text);
            live.transcript.push(Speaker::Candidate, text);

            // The last answer goes straight to evaluation
            if turn + 1 == self.config.max_turns {
                break;
            }

            let question = bounded("next question", timeouts.generation(), async {
                self.dialogue
                    .next_question(&live.transcript, &job)
                    .await
                    .map_err(InterviewError::Generation)
            })
            .await?;
            live.transcript.push(Speaker::AI, question.clone());
            self.send(conn, ServerMessage::question(question)).await?;
        }

        self.mark_evaluating(&live.id).await?;
        // Every answer is in; a client that leaves now still gets evaluated
        if let Err(e) = self.send(conn, ServerMessage::status(EVALUATING_NOTICE)).await {
            debug!("Session {}: evaluating notice not delivered: {}", live.id, e);
        }

        let result = bounded("evaluation", timeouts.generation(), async {
            self.dialogue
                .evaluate(&live.transcript, &job)
                .await
                .map_err(InterviewError::Generation)
        })
        .await?;

        let evaluation = match result {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!("Session {}: recording degraded evaluation ({})", live.id, e);
                Evaluation::degraded(e)
            }
        };

        bounded("final write", timeouts.store(), async {
            self.store
                .persist_final(
                    &live.id,
                    &live.transcript,
                    Some(&evaluation),
                    SessionStatus::Completed,
                )
                .await
                .map_err(InterviewError::from)
        })
        .await?;
        info!(
            "Session {} evaluation persisted ({} turns, score {})",
            live.id,
            live.transcript.len(),
            evaluation.score
        );

        self.spawn_decision(&live.id);
        Ok(evaluation)
    }

    async fn load_job(&self, job_id: &str) -> Result<JobContext, InterviewError> {
        bounded("job lookup", self.config.timeouts.store(), async {
            match self.jobs.get(job_id).await {
                Ok(Some(job)) => Ok(job),
                Ok(None) => Err(InterviewError::JobNotFound(job_id.to_string())),
                Err(e) => Err(InterviewError::JobLookup(e)),
            }
        })
        .await
    }

    async fn mark_evaluating(&self, session_id: &str) -> Result<(), InterviewError> {
        let moved = bounded("evaluating transition", self.config.timeouts.store(), async {
            self.store
                .compare_and_set_status(
                    session_id,
                    SessionStatus::InProgress,
                    SessionStatus::Evaluating,
                )
                .await
                .map_err(InterviewError::from)
        })
        .await?;

        if !moved {
            return Err(StoreError::InvalidTransition {
                id: session_id.to_string(),
                from: SessionStatus::InProgress,
                to: SessionStatus::Evaluating,
            }
            .into());
        }
        debug!("Session {} is evaluating", session_id);
        Ok(())
    }

    /// Wait for the next audio payload within the answer deadline
    async fn receive_answer<C: InterviewConnection>(
        &self,
        conn: &mut C,
    ) -> Result<Vec<u8>, InterviewError> {
        let limit = self.config.timeouts.answer();
        let deadline = Instant::now() + limit;

        loop {
            match tokio::time::timeout_at(deadline, conn.recv()).await {
                Err(_) => return Err(InterviewError::Timeout { step: "answer", limit }),
                Ok(None) | Ok(Some(ClientMessage::Close)) => {
                    return Err(InterviewError::ClientDisconnect)
                }
                Ok(Some(ClientMessage::Audio(bytes))) => return Ok(bytes),
                Ok(Some(ClientMessage::Text(text))) => {
                    warn!("Ignoring text frame while waiting for audio ({} chars)", text.len());
                }
            }
        }
    }

    async fn send<C: InterviewConnection>(
        &self,
        conn: &mut C,
        message: ServerMessage,
    ) -> Result<(), InterviewError> {
        let limit = self.config.timeouts.send();
        match tokio::time::timeout(limit, conn.send(message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                debug!("Send failed: {}", e);
                Err(InterviewError::ClientDisconnect)
            }
            Err(_) => Err(InterviewError::Timeout { step: "send", limit }),
        }
    }

    /// Fire-and-forget; the session is already `Completed`
    fn spawn_decision(&self, session_id: &str) {
        let trigger = Arc::clone(&self.decision);
        let session_id = session_id.to_string();
        let limit = self.config.timeouts.decision();

        tokio::spawn(async move {
            match tokio::time::timeout(limit, trigger.trigger(&session_id)).await {
                Ok(Ok(decision)) => {
                    info!("Decision for session {}: {:?}", session_id, decision)
                }
                Ok(Err(e)) => error!("Decision trigger failed for session {}: {:#}", session_id, e),
                Err(_) => error!(
                    "Decision trigger for session {} timed out after {:?}",
                    session_id, limit
                ),
            }
        });
    }

    async fn reject<C: InterviewConnection>(
        &self,
        session_id: &str,
        conn: &mut C,
        error: InterviewError,
    ) -> SessionOutcome {
        if error.is_rejection() {
            warn!("Rejected connection for session {}: {}", session_id, error);
        } else {
            error!("Could not claim session {}: {}", session_id, error);
        }

        if let Err(e) = self.send(conn, ServerMessage::error(notice_for(&error))).await {
            debug!("Rejection notice not delivered for {}: {}", session_id, e);
        }
        conn.close().await;

        if error.is_rejection() {
            SessionOutcome::Rejected
        } else {
            SessionOutcome::Aborted(error.to_string())
        }
    }

    /// Burn the session: stored as `Aborted`, never re-claimable
    async fn abort<C: InterviewConnection>(
        &self,
        live: &LiveSession,
        conn: &mut C,
        error: InterviewError,
    ) -> SessionOutcome {
        match &error {
            InterviewError::ClientDisconnect => {
                warn!("Interview {} disconnected by client", live.id)
            }
            _ => error!("Interview {} failed: {}", live.id, error),
        }

        let write = bounded("abort write", self.config.timeouts.store(), async {
            self.store
                .persist_final(&live.id, &live.transcript, None, SessionStatus::Aborted)
                .await
                .map_err(InterviewError::from)
        })
        .await;
        if let Err(e) = write {
            error!("Failed to mark session {} aborted: {}", live.id, e);
        }

        if !matches!(error, InterviewError::ClientDisconnect) {
            if let Err(e) = self.send(conn, ServerMessage::error(notice_for(&error))).await {
                debug!("Error notice not delivered for {}: {}", live.id, e);
            }
        }
        conn.close().await;

        SessionOutcome::Aborted(error.to_string())
    }
}
