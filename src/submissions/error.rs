use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::ApiError;

/// Error types for submission operations
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Submission not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Payment proof is required")]
    MissingProof,

    #[error("Payment proof exceeds the {max_mb}MB limit")]
    FileTooLarge { max_mb: usize },

    #[error("Unsupported payment proof type: {0}")]
    UnsupportedFileType(String),

    #[error("Malformed form data: {0}")]
    Multipart(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for SubmissionError {
    fn from(err: sqlx::Error) -> Self {
        SubmissionError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for SubmissionError {
    fn from(err: validator::ValidationErrors) -> Self {
        SubmissionError::ValidationError(err.to_string())
    }
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::DatabaseError(_) | SubmissionError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SubmissionError::NotFound => StatusCode::NOT_FOUND,
            SubmissionError::Forbidden(_) => StatusCode::FORBIDDEN,
            SubmissionError::InvalidTransition(_) => StatusCode::CONFLICT,
            SubmissionError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            SubmissionError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            SubmissionError::ValidationError(_)
            | SubmissionError::MissingProof
            | SubmissionError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            SubmissionError::DatabaseError(msg) => {
                error!("Database error in submissions: {}", msg);
                "Internal server error".to_string()
            }
            SubmissionError::Storage(msg) => {
                error!("Payment proof storage failed: {}", msg);
                "Failed to store payment proof".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// For callers that only read submissions alongside other tables
impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NotFound => ApiError::NotFound {
                resource: "Submission".to_string(),
                id: "unknown".to_string(),
            },
            SubmissionError::Forbidden(msg) => ApiError::Forbidden(msg),
            SubmissionError::InvalidTransition(message) => ApiError::Conflict { message },
            SubmissionError::DatabaseError(msg) | SubmissionError::Storage(msg) => {
                ApiError::InternalError(msg)
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}
