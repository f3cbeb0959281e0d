use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::cover_letter::CoverLetterError;
use crate::documents::RenderError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// An input the requested action depends on is absent. The message is
    /// shown to the user as a warning.
    #[error("{0}")]
    MissingInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("PDF conversion failed: {0}")]
    PdfConversion(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Empty => AppError::MissingInput("No file uploaded".to_string()),
            RenderError::NotPdf => {
                AppError::Validation("Uploaded file is not a PDF document".to_string())
            }
            other => AppError::PdfConversion(other.to_string()),
        }
    }
}

impl From<CoverLetterError> for AppError {
    fn from(e: CoverLetterError) -> Self {
        match e {
            CoverLetterError::Render(inner) => inner.into(),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(
                "The uploaded file is larger than the server accepts".to_string(),
            )
        } else {
            AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingInput(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MISSING_INPUT",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::PdfConversion(msg) => {
                tracing::warn!("PDF conversion error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PDF_CONVERSION_ERROR",
                    format!("Could not convert the PDF: {msg}"),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!("The AI service returned an error: {msg}"),
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
