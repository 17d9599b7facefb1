//! Axum route handlers for the advising chat.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::advising::composer::compose;
use crate::advising::engine::RecommendationResult;
use crate::state::AppState;
use crate::errors::AppError;
use crate::transcript::models::{StructuredTranscript, TranscriptRecord};
use crate::transcript::parser::parse_structured;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Kept untyped so a malformed transcript cannot reject the whole request.
    #[serde(default)]
    pub transcript_data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub has_transcript: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationResult>,
}

#[derive(Debug, Serialize)]
pub struct PrerequisiteEntry {
    pub code: String,
    pub prerequisites: Vec<String>,
}

/// POST /api/v1/chat
///
/// Always answers. A transcript that cannot be used falls back to the
/// no-transcript replies.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let record = request.transcript_data.and_then(|payload| {
        transcript_from_value(payload)
            .map_err(|e| warn!("Ignoring unusable transcript in chat request: {e}"))
            .ok()
    });
    let recommendations = record.as_ref().map(|r| state.recommender.recommend(r));
    let response = compose(&request.message, record.as_ref(), recommendations.as_ref());

    Json(ChatResponse {
        response,
        has_transcript: record.is_some(),
        recommendations,
    })
}

fn transcript_from_value(payload: serde_json::Value) -> Result<TranscriptRecord, AppError> {
    let payload: StructuredTranscript = serde_json::from_value(payload)
        .map_err(|e| AppError::Validation(format!("Malformed transcript data: {e}")))?;
    parse_structured(payload)
}

/// GET /api/v1/prerequisites
///
/// The loaded prerequisite table, in declaration order.
pub async fn handle_prerequisites(State(state): State<AppState>) -> Json<Vec<PrerequisiteEntry>> {
    let entries = state
        .graph
        .edges()
        .map(|edge| PrerequisiteEntry {
            code: edge.target.clone(),
            prerequisites: edge.prerequisites.iter().cloned().collect(),
        })
        .collect();
    Json(entries)
}
