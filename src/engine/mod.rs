//! Interview session engine
//!
//! Owns one live connection per interview:
//! - Claims the session (`PendingStart` -> `InProgress`) before any other I/O
//! - Asks the opening question, then runs a fixed number of answer/question turns
//! - Evaluates the transcript, persists it as `Completed` and fires the decision trigger
//! - Burns the session as `Aborted` on disconnect, timeout or any fatal error

mod connection;
mod engine;
mod messages;

pub use connection::InterviewConnection;
pub use engine::{EngineConfig, InterviewEngine, SessionOutcome};
pub use messages::{ClientMessage, ServerMessage};
