use super::state::AppState;
use super::websocket::WsConnection;
use crate::engine::SessionOutcome;
use crate::jobs::JobContext;
use crate::session::{InterviewSession, SessionFilter, SessionStatus};
use axum::{
    extract::{ws::WebSocketUpgrade, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

const DEFAULT_LIST_LIMIT: usize = 50;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub job_id: String,
    /// Candidate contact used for the decision notification
    pub candidate_ref: String,
}

#[derive(Debug, Serialize)]
pub struct CreateInterviewResponse {
    pub interview_id: String,
    pub status: SessionStatus,
    pub interview_link: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewListResponse {
    pub count: usize,
    pub interviews: Vec<InterviewSession>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /jobs
/// Register the job context interviews are generated from
pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> impl IntoResponse {
    if req.title.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Job title is required".to_string());
    }

    let job = JobContext::new(req.title, req.required_skills);
    let job_id = job.id.clone();

    match state.jobs.insert(job).await {
        Ok(()) => {
            info!("Registered job {}", job_id);
            (StatusCode::CREATED, Json(CreateJobResponse { job_id })).into_response()
        }
        Err(e) => {
            error!("Failed to register job: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to register job: {}", e),
            )
        }
    }
}

/// GET /jobs/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.jobs.get(&job_id).await {
        Ok(Some(job)) => (StatusCode::OK, Json(job)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("Job {} not found", job_id)),
        Err(e) => {
            error!("Failed to fetch job {}: {:#}", job_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /interviews
/// Shortlist a candidate: create a single-use interview session and its link
pub async fn create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> impl IntoResponse {
    let job = match state.jobs.get(&req.job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                format!("Job {} not found", req.job_id),
            )
        }
        Err(e) => {
            error!("Failed to fetch job {}: {:#}", req.job_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let session = InterviewSession::for_job(&job, req.candidate_ref);
    let interview_id = session.id.clone();

    if let Err(e) = state.store.insert(session).await {
        error!("Failed to create interview: {}", e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create interview: {}", e),
        );
    }

    let interview_link = state.interview_link(&interview_id);
    info!("AI interview {} created: {}", interview_id, interview_link);

    (
        StatusCode::CREATED,
        Json(CreateInterviewResponse {
            interview_id,
            status: SessionStatus::PendingStart,
            interview_link,
        }),
    )
        .into_response()
}

/// GET /interviews?status=&job_id=&candidate_ref=&limit=
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(mut filter): Query<SessionFilter>,
) -> impl IntoResponse {
    filter.limit = Some(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT));

    match state.store.list(&filter).await {
        Ok(interviews) => (
            StatusCode::OK,
            Json(InterviewListResponse {
                count: interviews.len(),
                interviews,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list interviews: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /interviews/:interview_id
pub async fn get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&interview_id).await {
        Ok(Some(session)) => (StatusCode::OK, Json(session)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("Interview {} not found", interview_id),
        ),
        Err(e) => {
            error!("Failed to fetch interview {}: {}", interview_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /ws/interview/:interview_id
/// Upgrade to the live interview connection
pub async fn interview_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let mut conn = WsConnection::new(socket);
        match state.engine.run(&interview_id, &mut conn).await {
            SessionOutcome::Completed(evaluation) => info!(
                "Interview {} finished, score {}",
                interview_id, evaluation.score
            ),
            SessionOutcome::Rejected => {
                warn!("Interview connection for {} rejected", interview_id)
            }
            SessionOutcome::Aborted(reason) => {
                warn!("Interview {} aborted: {}", interview_id, reason)
            }
        }
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
