use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::domain::limits::MAX_PAYLOAD_BYTES;
use crate::presentation::handlers::{
    cancel_handler, health_handler, run_handler, status_handler, stream_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/run", post(run_handler))
        .route("/status/{job_id}", get(status_handler))
        .route("/stream/{job_id}", get(stream_handler))
        .route("/cancel/{job_id}", post(cancel_handler))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .layer(trace_layer)
        .with_state(state)
}
