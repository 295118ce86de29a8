use crate::engine::InterviewEngine;
use crate::jobs::JobCatalog;
use crate::session::SessionStore;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs one interview per WebSocket connection
    pub engine: Arc<InterviewEngine>,
    pub store: Arc<dyn SessionStore>,
    pub jobs: Arc<dyn JobCatalog>,
    /// Base for shareable interview links (e.g. "wss://interviews.example.com")
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        engine: Arc<InterviewEngine>,
        store: Arc<dyn SessionStore>,
        jobs: Arc<dyn JobCatalog>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            store,
            jobs,
            public_base_url: public_base_url.into(),
        }
    }

    /// The session id is the only credential embedded in the link
    pub fn interview_link(&self, interview_id: &str) -> String {
        format!(
            "{}/ws/interview/{}",
            self.public_base_url.trim_end_matches('/'),
            interview_id
        )
    }
}
