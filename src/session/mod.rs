//! Interview session records and their storage
//!
//! This module provides:
//! - The `InterviewSession` record with its transcript and evaluation
//! - The `SessionStore` seam with in-memory and file-backed implementations
//! - The atomic `PendingStart` -> `InProgress` claim used by the engine

mod file_store;
mod model;
mod store;

pub use file_store::FileSessionStore;
pub use model::{
    Evaluation, InterviewSession, SessionFilter, SessionStatus, Speaker, Transcript, Turn,
};
pub use store::{InMemorySessionStore, SessionStore};
