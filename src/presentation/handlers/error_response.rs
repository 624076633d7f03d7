use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::JobId;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

pub fn parse_job_id(raw: &str) -> Result<JobId, Response> {
    raw.parse::<JobId>().map_err(|_| {
        error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", raw))
    })
}
