use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use super::backend::ChatBackend;
use super::evaluation::parse_evaluation;
use super::prompts;
use crate::error::EvaluationParseError;
use crate::jobs::JobContext;
use crate::session::{Evaluation, Transcript};

/// Outcome of the evaluation step. A parse failure is a value, not an error.
pub type EvaluationResult = std::result::Result<Evaluation, EvaluationParseError>;

/// Produces interviewer turns and the closing evaluation.
///
/// Stateless: every call is a function of the transcript and job context.
/// An `Err` means the backend call itself failed.
#[async_trait]
pub trait DialogueGenerator: Send + Sync {
    async fn opening_question(&self, job: &JobContext) -> Result<String>;

    async fn next_question(&self, transcript: &Transcript, job: &JobContext) -> Result<String>;

    async fn evaluate(&self, transcript: &Transcript, job: &JobContext)
        -> Result<EvaluationResult>;
}

/// Dialogue generator driven by a chat completion backend
pub struct LlmDialogueGenerator<B> {
    backend: B,
}

impl<B: ChatBackend> LlmDialogueGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ChatBackend> DialogueGenerator for LlmDialogueGenerator<B> {
    async fn opening_question(&self, job: &JobContext) -> Result<String> {
        let text = self.backend.complete(prompts::opening_question(job)).await?;
        Ok(text.trim().to_string())
    }

    async fn next_question(&self, transcript: &Transcript, job: &JobContext) -> Result<String> {
        let text = self
            .backend
            .complete(prompts::next_question(transcript, job))
            .await?;
        Ok(text.trim().to_string())
    }

    async fn evaluate(
        &self,
        transcript: &Transcript,
        job: &JobContext,
    ) -> Result<EvaluationResult> {
        let raw = self.backend.complete(prompts::evaluation(transcript, job)).await?;

        let result = parse_evaluation(&raw);
        match &result {
            Ok(eval) => info!("Parsed interview evaluation, score {}", eval.score),
            Err(e) => warn!("Failed to parse interview evaluation: {}. Raw response: {:?}", e, raw),
        }
        Ok(result)
    }
}
