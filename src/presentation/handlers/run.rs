use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Job, JobStatus};
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Deserialize)]
pub struct RunRequest {
    pub input: Value,
}

#[derive(Serialize)]
pub struct RunResponse {
    pub id: String,
    pub status: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn run_handler(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> impl IntoResponse {
    let job = Job::new(request.input);
    let job_id = job.id;

    if let Err(e) = state.job_store.create(&job).await {
        tracing::error!(error = %e, "Failed to create job");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create job: {}", e),
        );
    }

    if let Err(e) = state.job_sender.send(job_id).await {
        tracing::error!(job_id = %job_id, error = %e, "Failed to queue job");
        if let Err(e) = state
            .job_store
            .update_status(job_id, JobStatus::Failed, Some("Job queue unavailable"))
            .await
        {
            tracing::warn!(job_id = %job_id, error = %e, "Failed to mark unqueued job failed");
        }
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Job queue unavailable");
    }

    tracing::info!(job_id = %job_id, "Job queued");

    (
        StatusCode::OK,
        Json(RunResponse {
            id: job_id.to_string(),
            status: JobStatus::InQueue.as_str().to_string(),
        }),
    )
        .into_response()
}
