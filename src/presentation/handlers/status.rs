use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::Value;

use crate::presentation::state::AppState;

use super::error_response::{error_response, parse_job_id};

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub status: String,
    /// All outputs, present once the job is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.job_store.get_by_id(id).await {
        Ok(Some(job)) => {
            let output = job.status.is_terminal().then_some(job.outputs);
            let response = JobStatusResponse {
                id: job.id.to_string(),
                status: job.status.as_str().to_string(),
                output,
                error: job.error_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("Job not found: {}", job_id),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch job: {}", e),
            )
        }
    }
}
