use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// Lifetime of an upload URL. A failed upload must request a fresh one.
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(60);

const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    pub user_id: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub url: String,
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

/// File extension for an accepted resume content type.
pub fn resume_extension(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "application/pdf" => Some("pdf"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        _ => None,
    }
}

/// Object key for a new resume: `<userId>/resume-<unix millis>.<ext>`.
pub fn resume_key(user_id: &str, extension: &str, timestamp_millis: i64) -> String {
    format!("{user_id}/resume-{timestamp_millis}.{extension}")
}

/// The user id becomes the key's first path segment, so it may not add or climb segments.
fn is_single_segment(user_id: &str) -> bool {
    !user_id.contains(['/', '\\']) && !user_id.contains("..")
}

/// Public object URL, only meaningful when the bucket is public.
pub fn public_object_url(supabase_url: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{key}",
        supabase_url.trim_end_matches('/')
    )
}

/// POST /storage/upload-url
pub async fn handle_upload_url(
    State(state): State<AppState>,
    payload: Result<Json<UploadUrlRequest>, JsonRejection>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Missing userId".to_string()))?;
    if !is_single_segment(user_id) {
        return Err(AppError::Validation("Invalid userId".to_string()));
    }

    let content_type = req
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let extension = resume_extension(content_type).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported contentType '{content_type}': only PDF or Word files allowed"
        ))
    })?;

    let signer = state
        .uploads
        .as_ref()
        .ok_or(AppError::StorageNotConfigured)?;

    let bucket = state.config.resumes_bucket.clone();
    let key = resume_key(user_id, extension, chrono::Utc::now().timestamp_millis());

    let url = signer
        .presign_put(&bucket, &key, content_type, UPLOAD_URL_TTL)
        .await?;

    let public_url = state
        .config
        .supabase_url
        .as_deref()
        .map(|base| public_object_url(base, &bucket, &key));

    info!("Issued upload URL for {bucket}/{key}");

    Ok(Json(UploadUrlResponse {
        url,
        bucket,
        key,
        public_url,
    }))
}
