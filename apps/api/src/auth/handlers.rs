use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::client::{IdentityError, IdentityProvider};
use crate::errors::AppError;
use crate::profile::ProfileData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub user_data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: Value,
    pub session: Value,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: Option<String>,
    pub profile: ProfileData,
    pub completeness: u8,
}

#[derive(Debug, Serialize)]
pub struct ProfileSaveResponse {
    pub user: Value,
    pub completeness: u8,
}

fn identity(state: &AppState) -> Result<&Arc<dyn IdentityProvider>, AppError> {
    state.identity.as_ref().ok_or(AppError::AuthNotConfigured)
}

/// Extracts the access token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

fn require_token(headers: &HeaderMap) -> Result<&str, AppError> {
    bearer_token(headers).ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))
}

fn require_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }
    Ok(())
}

/// Token-scoped calls answer 401 when the provider refuses the token.
fn token_rejected(err: IdentityError) -> AppError {
    match err {
        IdentityError::Rejected { message, .. } => AppError::Unauthorized(message),
        other => other.into(),
    }
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::Validation(e.body_text()))
}

/// POST /auth/signup
pub async fn handle_sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let provider = identity(&state)?;
    let req = read_body(payload)?;
    require_credentials(&req.email, &req.password)?;

    let user_data = req.user_data.unwrap_or_else(|| json!({}));
    let session = provider
        .sign_up(req.email.trim(), &req.password, user_data)
        .await?;
    info!("User signed up: {}", req.email.trim());

    Ok(Json(SessionResponse {
        message: "User created successfully",
        user: session.user,
        session: session.session,
    }))
}

/// POST /auth/signin
pub async fn handle_sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let provider = identity(&state)?;
    let req = read_body(payload)?;
    require_credentials(&req.email, &req.password)?;

    let session = provider.sign_in(req.email.trim(), &req.password).await?;

    Ok(Json(SessionResponse {
        message: "Signed in successfully",
        user: session.user,
        session: session.session,
    }))
}

/// POST /auth/signout
///
/// Without a token there is no server-side session to revoke, so it simply succeeds.
pub async fn handle_sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let provider = identity(&state)?;
    if let Some(token) = bearer_token(&headers) {
        provider.sign_out(token).await?;
    }
    Ok(Json(json!({ "message": "Signed out successfully" })))
}

/// GET /auth/user
pub async fn handle_get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let provider = identity(&state)?;
    let token = require_token(&headers)?;
    let user = provider.get_user(token).await.map_err(token_rejected)?;
    Ok(Json(json!({ "user": user })))
}

/// GET /auth/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AppError> {
    let provider = identity(&state)?;
    let token = require_token(&headers)?;
    let user = provider.get_user(token).await.map_err(token_rejected)?;

    let profile = ProfileData::from_metadata(user.get("user_metadata").unwrap_or(&Value::Null));
    let completeness = profile.completeness();

    Ok(Json(ProfileResponse {
        email: user.get("email").and_then(Value::as_str).map(String::from),
        profile,
        completeness,
    }))
}

/// PUT /auth/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProfileData>, JsonRejection>,
) -> Result<Json<ProfileSaveResponse>, AppError> {
    let provider = identity(&state)?;
    let token = require_token(&headers)?;
    let profile = read_body(payload)?;

    let completeness = profile.completeness();
    let user = provider
        .update_user_metadata(token, profile.to_metadata())
        .await
        .map_err(token_rejected)?;

    Ok(Json(ProfileSaveResponse { user, completeness }))
}
