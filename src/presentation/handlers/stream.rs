use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::application::ports::StreamBatch;
use crate::presentation::state::AppState;

use super::error_response::{error_response, parse_job_id};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct StreamResponse {
    pub status: String,
    pub stream: Vec<StreamItem>,
}

#[derive(Serialize)]
pub struct StreamItem {
    pub output: Value,
}

impl From<StreamBatch> for StreamResponse {
    fn from(batch: StreamBatch) -> Self {
        Self {
            status: batch.status.as_str().to_string(),
            stream: batch
                .outputs
                .into_iter()
                .map(|output| StreamItem { output })
                .collect(),
        }
    }
}

/// Long-polls for outputs the caller has not seen yet.
///
/// Answers as soon as there is at least one new output or the job is
/// terminal, otherwise after the configured wait with an empty batch.
/// With `?offset=N` the outputs from `N` on are returned and nothing is
/// consumed, so a client whose read was lost can ask again. Without it
/// each output is handed out once.
#[tracing::instrument(skip(state))]
pub async fn stream_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(query): Query<StreamQuery>,
) -> impl IntoResponse {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let deadline = Instant::now() + state.stream_wait;

    loop {
        let read = match query.offset {
            Some(offset) => state.job_store.read_outputs(id, offset).await,
            None => state.job_store.take_pending(id).await,
        };
        let batch = match read {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                return error_response(
                    StatusCode::NOT_FOUND,
                    format!("Job not found: {}", job_id),
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read job stream");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read job stream: {}", e),
                );
            }
        };

        if !batch.outputs.is_empty() || batch.status.is_terminal() || Instant::now() >= deadline
        {
            return (StatusCode::OK, Json(StreamResponse::from(batch))).into_response();
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
