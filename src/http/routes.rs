use super::handlers;
use super::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// CORS for the candidate and recruiter web pages
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Job contexts
        .route("/jobs", post(handlers::create_job))
        .route("/jobs/:job_id", get(handlers::get_job))
        // Shortlisting and session queries
        .route(
            "/interviews",
            post(handlers::create_interview).get(handlers::list_interviews),
        )
        .route("/interviews/:interview_id", get(handlers::get_interview))
        // Live interview
        .route(
            "/ws/interview/:interview_id",
            get(handlers::interview_socket),
        )
        .layer(cors_layer(cors_origins))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
