use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::client::IdentityError;
use crate::jobs::client::UpstreamError;
use crate::storage::PresignError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{ "error": ..., "detail"?: ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Auth provider rejected request: {0}")]
    AuthRejected(String),

    #[error("Auth not configured")]
    AuthNotConfigured,

    #[error("S3 not configured")]
    StorageNotConfigured,

    #[error("Presign error: {0}")]
    Presign(String),

    #[error("Upstream error (status {status}): {detail}")]
    Upstream { status: StatusCode, detail: Value },

    #[error("Route not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::AuthRejected(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::AuthNotConfigured => (
                StatusCode::NOT_IMPLEMENTED,
                json!({ "error": "Auth not configured" }),
            ),
            AppError::StorageNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "S3 not configured",
                    "detail": "Missing SUPABASE_S3_* env vars"
                }),
            ),
            AppError::Presign(detail) => {
                tracing::error!("presign error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to create upload URL", "detail": detail }),
                )
            }
            AppError::Upstream { status, detail } => {
                tracing::error!("jobs proxy error {status}: {detail}");
                (status, json!({ "error": "Failed to fetch jobs", "detail": detail }))
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Route not found" })),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Something went wrong!" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                detail: body,
            },
            UpstreamError::Http(e) => AppError::Upstream {
                status: e
                    .status()
                    .and_then(|s| StatusCode::from_u16(s.as_u16()).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                detail: Value::String(e.to_string()),
            },
        }
    }
}

impl From<PresignError> for AppError {
    fn from(err: PresignError) -> Self {
        AppError::Presign(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected { message, .. } => AppError::AuthRejected(message),
            other => AppError::Internal(other.into()),
        }
    }
}
