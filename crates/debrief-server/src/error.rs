use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use debrief_pipeline::{ErrorKind, PipelineError};
use debrief_storage::error::StorageError;
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// The model API failed or answered with something unusable.
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => {
                tracing::warn!("upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, msg)
            }
            // Details stay in the log; they can name files and tables.
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::RowOutOfRange { .. } => ApiError::NotFound(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Storage(inner) => inner.into(),
            aborted @ PipelineError::SweepAborted { .. } => ApiError::Internal(aborted.to_string()),
            other => match other.kind() {
                ErrorKind::RemoteService | ErrorKind::ResponseFormat => {
                    ApiError::BadGateway(other.to_string())
                }
                _ => ApiError::Internal(other.to_string()),
            },
        }
    }
}
