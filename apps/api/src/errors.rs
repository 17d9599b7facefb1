use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Empty input, not a PDF, or a PDF without pages.
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    /// The document was read but no course line was recognized.
    #[error("No course data found")]
    NoCourseDataFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Processing failure: {0}")]
    ProcessingFailure(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnreadableDocument(msg) => (
                StatusCode::BAD_REQUEST,
                "UNREADABLE_DOCUMENT",
                format!("The uploaded document could not be read: {msg}"),
            ),
            AppError::NoCourseDataFound => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_COURSE_DATA",
                "No course entries were found. The document is not a transcript or uses an unsupported format."
                    .to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::ProcessingFailure(e) => {
                tracing::error!("Processing failure: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROCESSING_FAILURE",
                    "Sorry, something went wrong while processing your request.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
