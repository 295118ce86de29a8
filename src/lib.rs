pub mod audio;
pub mod config;
pub mod decision;
pub mod dialogue;
pub mod engine;
pub mod error;
pub mod http;
pub mod jobs;
pub mod nats;
pub mod session;
pub mod transcription;

pub use audio::AudioSegment;
pub use config::Config;
pub use decision::{Decision, DecisionTrigger, LogNotifier, NatsNotifier, Notifier, ScoreDecisionTrigger};
pub use dialogue::{DialogueGenerator, LlmDialogueGenerator, OpenAiCompatibleBackend};
pub use engine::{
    ClientMessage, EngineConfig, InterviewConnection, InterviewEngine, ServerMessage,
    SessionOutcome,
};
pub use error::{EvaluationParseError, InterviewError, StoreError};
pub use http::{create_router, AppState};
pub use jobs::{InMemoryJobCatalog, JobCatalog, JobContext};
pub use nats::{NatsClient, NotificationMessage, TranscriptionReply, TranscriptionRequest};
pub use session::{
    Evaluation, FileSessionStore, InMemorySessionStore, InterviewSession, SessionFilter,
    SessionStatus, SessionStore, Speaker, Transcript, Turn,
};
pub use transcription::{NatsTranscriber, Transcriber};
