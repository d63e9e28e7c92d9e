use axum::response::Json;
use serde_json::{json, Value};

/// GET / - basic liveness payload
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "server is running",
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
