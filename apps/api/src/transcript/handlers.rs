//! Axum route handlers for transcript ingestion.

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::advising::engine::RecommendationResult;
use crate::errors::AppError;
use crate::state::AppState;
use crate::transcript::extract::extract_text;
use crate::transcript::models::{TranscriptRecord, TranscriptSource};

/// Multipart field carrying the document.
const UPLOAD_FIELD: &str = "pdf";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub page_count: usize,
    pub transcript: TranscriptRecord,
    pub recommendations: RecommendationResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub transcript: TranscriptRecord,
    pub recommendations: RecommendationResult,
}

/// POST /api/v1/transcripts
///
/// Extracts, parses, and evaluates an uploaded transcript PDF.
/// Nothing is stored; the caller keeps the returned record.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let is_pdf = field
            .content_type()
            .map_or(true, |ct| ct == "application/pdf");
        if !is_pdf {
            return Err(AppError::Validation(
                "Only PDF files are allowed".to_string(),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some(bytes);
        break;
    }

    let bytes = upload.ok_or_else(|| {
        AppError::Validation(format!("No PDF file uploaded in field '{UPLOAD_FIELD}'"))
    })?;
    info!("Received transcript upload ({} bytes)", bytes.len());

    let parser = state.parser.clone();
    let (document, transcript) = tokio::task::spawn_blocking(move || {
        let document = extract_text(&bytes)?;
        let transcript = parser.parse_text(&document.full_text())?;
        Ok::<_, AppError>((document, transcript))
    })
    .await
    .context("Transcript extraction task failed")??;

    let recommendations = state.recommender.recommend(&transcript);

    Ok(Json(UploadResponse {
        page_count: document.page_count,
        transcript,
        recommendations,
    }))
}

/// POST /api/v1/transcripts/parse
///
/// Accepts `{"text": "..."}` or `{"structured": {...}}`.
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(source): Json<TranscriptSource>,
) -> Result<Json<ParseResponse>, AppError> {
    let transcript = state.parser.parse(source)?;
    let recommendations = state.recommender.recommend(&transcript);

    Ok(Json(ParseResponse {
        transcript,
        recommendations,
    }))
}
