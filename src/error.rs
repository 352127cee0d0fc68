use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No conversion job found for file ID '{0}'")]
    JobNotFound(String),

    #[error("Audio file for '{0}' is recorded but missing from storage")]
    AudioFileMissing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::JobNotFound(id) => (
                StatusCode::NOT_FOUND,
                "FILE_NOT_FOUND",
                format!("No conversion job found for file ID '{}'", id),
            ),
            AppError::AudioFileMissing(id) => (
                StatusCode::NOT_FOUND,
                "AUDIO_FILE_MISSING",
                format!("Audio file for '{}' is recorded but missing from storage", id),
            ),
            AppError::Database(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                e.to_string(),
            ),
            AppError::IoError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                e.to_string(),
            ),
        };

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
