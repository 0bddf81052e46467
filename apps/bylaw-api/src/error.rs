//! Error types for the bylaw citation server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use highlight_core::HighlightError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// No citation could be used or located; the message is the same for both
    #[error("{0}")]
    NothingToHighlight(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Highlight timeout after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NothingToHighlight(_) => (StatusCode::BAD_REQUEST, "NO_VALID_CITATIONS"),
            ApiError::SourceNotFound(_) => (StatusCode::NOT_FOUND, "SOURCE_NOT_FOUND"),
            ApiError::Timeout(_) => (StatusCode::REQUEST_TIMEOUT, "TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Internal details are logged, not returned
        let message = if let ApiError::Internal(_) = self {
            tracing::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<HighlightError> for ApiError {
    fn from(err: HighlightError) -> Self {
        match err {
            e if e.is_nothing_to_highlight() => ApiError::NothingToHighlight(e.to_string()),
            HighlightError::SourceUnavailable(msg) => ApiError::SourceNotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
