use super::model::{Evaluation, InterviewSession, SessionFilter, SessionStatus, Transcript};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Durable owner of interview sessions.
///
/// Shared by every live connection. `compare_and_set_status` is the one
/// operation that must be atomic per session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a freshly created session (upstream shortlisting)
    async fn insert(&self, session: InterviewSession) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<InterviewSession>, StoreError>;

    /// Move `id` from `expected` to `next`. Returns `false` when the session
    /// is absent or its current status differs from `expected`.
    async fn compare_and_set_status(
        &self,
        id: &str,
        expected: SessionStatus,
        next: SessionStatus,
    ) -> Result<bool, StoreError>;

    /// Write the terminal record of a claimed session
    async fn persist_final(
        &self,
        id: &str,
        transcript: &Transcript,
        evaluation: Option<&Evaluation>,
        status: SessionStatus,
    ) -> Result<(), StoreError>;

    /// Sessions matching `filter`, newest first
    async fn list(&self, filter: &SessionFilter) -> Result<Vec<InterviewSession>, StoreError>;
}

/// Apply a final write to a session record, enforcing that only a claimed,
/// non-terminal session can be finalized.
pub(crate) fn apply_final(
    session: &mut InterviewSession,
    transcript: &Transcript,
    evaluation: Option<&Evaluation>,
    status: SessionStatus,
) -> Result<(), StoreError> {
    if !session.status.is_claimed() || !status.is_terminal() {
        return Err(StoreError::InvalidTransition {
            id: session.id.clone(),
            from: session.status,
            to: status,
        });
    }

    session.transcript = transcript.clone();
    session.turn_count = transcript.candidate_turns();
    session.evaluation = evaluation.cloned();
    session.status = status;
    session.updated_at = Utc::now();
    Ok(())
}

pub(crate) fn sort_and_limit(
    mut sessions: Vec<InterviewSession>,
    filter: &SessionFilter,
) -> Vec<InterviewSession> {
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = filter.limit {
        sessions.truncate(limit);
    }
    sessions
}

/// In-memory session store
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, InterviewSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: InterviewSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::AlreadyExists(session.id));
        }
        info!("Stored interview session {} for job {}", session.id, session.job_id);
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<InterviewSession>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn compare_and_set_status(
        &self,
        id: &str,
        expected: SessionStatus,
        next: SessionStatus,
    ) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) if session.status == expected => {
                session.status = next;
                session.updated_at = Utc::now();
                debug!("Session {} moved {:?} -> {:?}", id, expected, next);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn persist_final(
        &self,
        id: &str,
        transcript: &Transcript,
        evaluation: Option<&Evaluation>,
        status: SessionStatus,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_final(session, transcript, evaluation, status)
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<InterviewSession>, StoreError> {
        let sessions = self.sessions.read().await;
        let matching = sessions
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        Ok(sort_and_limit(matching, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Speaker;

    #[tokio::test]
    async fn test_claim_only_from_pending() {
        let store = InMemorySessionStore::new();
        let session = InterviewSession::pending("job-1", "ada@example.com");
        let id = session.id.clone();
        store.insert(session).await.unwrap();

        assert!(store
            .compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress)
            .await
            .unwrap());
        assert!(!store
            .compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress)
            .await
            .unwrap());
        assert!(!store
            .compare_and_set_status("missing", SessionStatus::PendingStart, SessionStatus::InProgress)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_persist_final_requires_claim() {
        let store = InMemorySessionStore::new();
        let session = InterviewSession::pending("job-1", "ada@example.com");
        let id = session.id.clone();
        store.insert(session).await.unwrap();

        let transcript = Transcript::new();
        let result = store
            .persist_final(&id, &transcript, None, SessionStatus::Aborted)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_persist_final_sets_turn_count() {
        let store = InMemorySessionStore::new();
        let session = InterviewSession::pending("job-1", "ada@example.com");
        let id = session.id.clone();
        store.insert(session).await.unwrap();
        store
            .compare_and_set_status(&id, SessionStatus::PendingStart, SessionStatus::InProgress)
            .await
            .unwrap();

        let mut transcript = Transcript::new();
        transcript.push(Speaker::AI, "Q1");
        transcript.push(Speaker::Candidate, "A1");
        let eval = Evaluation::degraded("bad json");
        store
            .persist_final(&id, &transcript, Some(&eval), SessionStatus::Completed)
            .await
            .unwrap();

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Completed);
        assert_eq!(stored.turn_count, 1);
        assert_eq!(stored.transcript.len(), 2);
        assert_eq!(stored.score(), 0);

        // Terminal records are never rewritten
        let again = store
            .persist_final(&id, &transcript, None, SessionStatus::Aborted)
            .await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn test_insert_duplicate_rejected() {
        let store = InMemorySessionStore::new();
        let session = InterviewSession::pending("job-1", "ada@example.com");
        store.insert(session.clone()).await.unwrap();
        assert!(matches!(
            store.insert(session).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }
}
