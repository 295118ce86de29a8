use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Read-only snapshot of the job a candidate is interviewed for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl JobContext {
    pub fn new(title: impl Into<String>, required_skills: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            required_skills,
        }
    }

    /// Skills as a comma separated list for prompts
    pub fn skills_list(&self) -> String {
        if self.required_skills.is_empty() {
            "none specified".to_string()
        } else {
            self.required_skills.join(", ")
        }
    }
}

/// Source of job contexts (owned by the job records service)
#[async_trait]
pub trait JobCatalog: Send + Sync {
    async fn get(&self, job_id: &str) -> anyhow::Result<Option<JobContext>>;

    async fn insert(&self, job: JobContext) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct InMemoryJobCatalog {
    jobs: RwLock<HashMap<String, JobContext>>,
}

impl InMemoryJobCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobCatalog for InMemoryJobCatalog {
    async fn get(&self, job_id: &str) -> anyhow::Result<Option<JobContext>> {
        Ok(self.jobs.read().await.get(job_id).cloned())
    }

    async fn insert(&self, job: JobContext) -> anyhow::Result<()> {
        self.jobs.write().await.insert(job.id.clone(), job);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_list() {
        let job = JobContext::new("Backend Engineer", vec!["Go".into(), "SQL".into()]);
        assert_eq!(job.skills_list(), "Go, SQL");

        let empty = JobContext::new("Generalist", vec![]);
        assert_eq!(empty.skills_list(), "none specified");
    }
}
