use super::model::{Evaluation, InterviewSession, SessionFilter, SessionStatus, Transcript};
use super::store::{apply_final, sort_and_limit, SessionStore};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Session store keeping one JSON document per session in a directory.
///
/// All read-modify-write operations run under a single async mutex, which
/// keeps compare-and-set atomic for every connection served by this process.
pub struct FileSessionStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        info!("File session store at {}", dir.display());
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        // Ids are generated uuids; anything else is flattened to stay inside `dir`
        let safe: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    async fn read(&self, id: &str) -> Result<Option<InterviewSession>, StoreError> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file so a crash never leaves a half-written record
    async fn write(&self, session: &InterviewSession) -> Result<(), StoreError> {
        let path = self.path_for(&session.id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn insert(&self, session: InterviewSession) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.read(&session.id).await?.is_some() {
            return Err(StoreError::AlreadyExists(session.id));
        }
        self.write(&session).await?;
        info!("Stored interview session {} for job {}", session.id, session.job_id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<InterviewSession>, StoreError> {
        self.read(id).await
    }

    async fn compare_and_set_status(
        &self,
        id: &str,
        expected: SessionStatus,
        next: SessionStatus,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(mut session) = self.read(id).await? else {
            return Ok(false);
        };
        if session.status != expected {
            return Ok(false);
        }
        session.status = next;
        session.updated_at = Utc::now();
        self.write(&session).await?;
        Ok(true)
    }

    async fn persist_final(
        &self,
        id: &str,
        transcript: &Transcript,
        evaluation: Option<&Evaluation>,
        status: SessionStatus,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut session = self
            .read(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_final(&mut session, transcript, evaluation, status)?;
        self.write(&session).await
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<InterviewSession>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut sessions = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<InterviewSession>(&bytes) {
                Ok(session) if filter.matches(&session) => sessions.push(session),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable session file {}: {}", path.display(), e),
            }
        }

        Ok(sort_and_limit(sessions, filter))
    }
}
