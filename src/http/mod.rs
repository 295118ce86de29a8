//! HTTP and WebSocket surface
//!
//! - POST /jobs - Register a job context
//! - GET /jobs/:id - Fetch a job context
//! - POST /interviews - Shortlist a candidate and issue an interview link
//! - GET /interviews - List sessions (filters: status, job_id, candidate_ref, limit)
//! - GET /interviews/:id - Fetch one session with transcript and evaluation
//! - GET /ws/interview/:id - Live interview connection
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;
mod websocket;

pub use handlers::{CreateInterviewResponse, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
pub use websocket::WsConnection;
