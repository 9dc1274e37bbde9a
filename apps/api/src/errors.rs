use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Engine errors
// ────────────────────────────────────────────────────────────────────────────

/// Failure of the backing document store. Always fatal for the run.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("PDF encoding error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("draw operation issued before any page was opened")]
    NoOpenPage,
}

/// Errors surfaced by report generation.
///
/// Missing data, impossible layouts and unreachable images all degrade the
/// output instead of failing, so only the canvas (or the task rendering onto it) can fail a run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("render task failed: {0}")]
    Task(String),
}

/// Why an image could not be resolved. Logged by the image placer and never
/// propagated past it.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("empty response body from {0}")]
    EmptyBody(String),

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has zero width or height")]
    ZeroSized,

    #[error("decode task failed: {0}")]
    Task(String),
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP errors
// ────────────────────────────────────────────────────────────────────────────

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Report(e) => {
                tracing::error!("Report error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPORT_ERROR",
                    "The report could not be generated".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("occupancy out of range".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_canvas_failure_maps_to_internal_error() {
        let err = ReportError::from(CanvasError::NoOpenPage);
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
