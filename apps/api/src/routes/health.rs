use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "JobSearch Backend is running!",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
