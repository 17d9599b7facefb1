pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advising::handlers as advising;
use crate::state::AppState;
use crate::transcript::handlers as transcript;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Transcript ingestion
        .route("/api/v1/transcripts", post(transcript::handle_upload))
        .route("/api/v1/transcripts/parse", post(transcript::handle_parse))
        // Advising
        .route("/api/v1/chat", post(advising::handle_chat))
        .route("/api/v1/prerequisites", get(advising::handle_prerequisites))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
