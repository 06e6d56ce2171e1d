pub mod health;

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::jobs::handlers as jobs;
use crate::state::AppState;
use crate::storage::handlers as storage;

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Converts a handler panic into the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job search proxy
        .route("/jobs", get(jobs::handle_search_jobs))
        // Resume uploads
        .route("/storage/upload-url", post(storage::handle_upload_url))
        // Auth passthrough
        .route("/auth/signup", post(auth::handle_sign_up))
        .route("/auth/signin", post(auth::handle_sign_in))
        .route("/auth/signout", post(auth::handle_sign_out))
        .route("/auth/user", get(auth::handle_get_user))
        .route(
            "/auth/profile",
            get(auth::handle_get_profile).put(auth::handle_save_profile),
        )
        .fallback(not_found)
        .with_state(state)
}
