use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::domain::JobStatus;
use crate::presentation::state::AppState;

use super::error_response::{error_response, parse_job_id};

#[derive(Serialize)]
pub struct CancelResponse {
    pub id: String,
    pub status: String,
}

/// Cancels a queued or running job. Terminal jobs keep their status.
#[tracing::instrument(skip(state))]
pub async fn cancel_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let status = match state
        .job_store
        .update_status(id, JobStatus::Cancelled, None)
        .await
    {
        Ok(()) => {
            tracing::info!(job_id = %id, "Job cancelled");
            JobStatus::Cancelled
        }
        Err(RepositoryError::InvalidTransition(_)) => {
            match state.job_store.status(id).await {
                Ok(Some(status)) => status,
                Ok(None) => {
                    return error_response(
                        StatusCode::NOT_FOUND,
                        format!("Job not found: {}", job_id),
                    );
                }
                Err(e) => {
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to cancel job: {}", e),
                    );
                }
            }
        }
        Err(RepositoryError::NotFound(_)) => {
            return error_response(
                StatusCode::NOT_FOUND,
                format!("Job not found: {}", job_id),
            );
        }
    };

    (
        StatusCode::OK,
        Json(CancelResponse {
            id: id.to_string(),
            status: status.as_str().to_string(),
        }),
    )
        .into_response()
}
