use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_model: Option<LoadedModel>,
}

#[derive(Serialize)]
pub struct LoadedModel {
    pub engine: String,
    pub model: String,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = match state.models.try_current() {
        Ok(current) => HealthResponse {
            status: "healthy".to_string(),
            loaded_model: current.map(|(engine, model)| LoadedModel {
                engine: engine.to_string(),
                model,
            }),
        },
        Err(_) => HealthResponse {
            status: "loading".to_string(),
            loaded_model: None,
        },
    };

    (StatusCode::OK, Json(response))
}
