use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::nats::{NatsClient, NotificationMessage};
use crate::session::SessionStore;

/// Hiring decision derived from the persisted interview score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Proceed,
    Reject,
}

impl Decision {
    /// `score >= threshold` proceeds
    pub fn from_score(score: u8, threshold: u8) -> Self {
        if score >= threshold {
            Decision::Proceed
        } else {
            Decision::Reject
        }
    }
}

/// Downstream step run once per completed session, after the evaluation is persisted
#[async_trait]
pub trait DecisionTrigger: Send + Sync {
    async fn trigger(&self, session_id: &str) -> Result<Decision>;
}

/// Delivery of candidate notifications (email lives behind this seam)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &NotificationMessage) -> Result<()>;
}

/// Notifier that only logs the request
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &NotificationMessage) -> Result<()> {
        info!(
            "Notification requested: {:?} for {} (session {}, job {}, score {})",
            notification.decision,
            notification.candidate_ref,
            notification.session_id,
            notification.job_id,
            notification.score
        );
        Ok(())
    }
}

/// Notifier publishing requests for the mailer over NATS
pub struct NatsNotifier {
    nats: NatsClient,
    subject: String,
}

impl NatsNotifier {
    pub fn new(nats: NatsClient, subject: impl Into<String>) -> Self {
        Self {
            nats,
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn notify(&self, notification: &NotificationMessage) -> Result<()> {
        self.nats
            .publish_notification(&self.subject, notification)
            .await
    }
}

/// Threshold router: reads the persisted score and requests the matching notification
pub struct ScoreDecisionTrigger {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    hire_threshold: u8,
}

impl ScoreDecisionTrigger {
    pub fn new(store: Arc<dyn SessionStore>, notifier: Arc<dyn Notifier>, hire_threshold: u8) -> Self {
        Self {
            store,
            notifier,
            hire_threshold,
        }
    }
}

#[async_trait]
impl DecisionTrigger for ScoreDecisionTrigger {
    async fn trigger(&self, session_id: &str) -> Result<Decision> {
        let session = self
            .store
            .get(session_id)
            .await?
            .with_context(|| format!("Interview {} not found for decision", session_id))?;

        let score = session.score();
        let decision = Decision::from_score(score, self.hire_threshold);
        match decision {
            Decision::Proceed => info!(
                "PROCEED decision for {}: score {} >= {}",
                session_id, score, self.hire_threshold
            ),
            Decision::Reject => info!(
                "REJECT decision for {}: score {} < {}",
                session_id, score, self.hire_threshold
            ),
        }

        let notification = NotificationMessage {
            session_id: session.id.clone(),
            candidate_ref: session.candidate_ref.clone(),
            job_id: session.job_id.clone(),
            decision,
            score,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        self.notifier
            .notify(&notification)
            .await
            .context("Failed to request candidate notification")?;

        Ok(decision)
    }
}
