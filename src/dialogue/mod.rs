//! Interviewer dialogue
//!
//! - `ChatBackend`: OpenAI-compatible text generation
//! - `DialogueGenerator`: opening question, follow-ups and the closing evaluation
//! - `parse_evaluation`: strict JSON parsing of the evaluation response

pub mod backend;
mod evaluation;
mod generator;
mod prompts;

pub use backend::{ChatBackend, ChatMessage, ChatRole, OpenAiCompatibleBackend};
pub use evaluation::parse_evaluation;
pub use generator::{DialogueGenerator, EvaluationResult, LlmDialogueGenerator};
