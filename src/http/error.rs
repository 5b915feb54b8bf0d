//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::error::TimetableError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details (e.g. the colliding meetings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// State-level rejection: scheduling conflict, ambiguous locator or a
    /// lost optimistic-concurrency race
    Conflict {
        code: &'static str,
        message: String,
        details: Option<serde_json::Value>,
    },
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict {
                code,
                message,
                details,
            } => {
                let mut error = ApiError::new(code, message);
                if let Some(details) = details {
                    error = error.with_details(details);
                }
                (StatusCode::CONFLICT, error)
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", e.to_string()))
                }
                RepositoryError::ValidationError { .. } => (
                    StatusCode::BAD_REQUEST,
                    ApiError::new("BAD_REQUEST", e.to_string()),
                ),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("REPOSITORY_ERROR", other.to_string()),
                ),
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TimetableError> for AppError {
    fn from(err: TimetableError) -> Self {
        match err {
            TimetableError::InvalidDayToken { .. }
            | TimetableError::InvalidSectionCode { .. }
            | TimetableError::InvalidTimeRange { .. }
            | TimetableError::LabRoomRequired { .. } => AppError::BadRequest(err.to_string()),
            TimetableError::MeetingNotFound { detail } => AppError::NotFound(detail),
            TimetableError::AmbiguousLocator { .. } => AppError::Conflict {
                code: "AMBIGUOUS_LOCATOR",
                message: err.to_string(),
                details: None,
            },
            TimetableError::ResourceConflict { ref conflicts } => AppError::Conflict {
                code: "RESOURCE_CONFLICT",
                message: err.to_string(),
                details: serde_json::to_value(conflicts).ok(),
            },
            TimetableError::ConcurrentModification { .. } => AppError::Conflict {
                code: "CONCURRENT_MODIFICATION",
                message: err.to_string(),
                details: None,
            },
            TimetableError::Repository(e) => AppError::Repository(e),
        }
    }
}
