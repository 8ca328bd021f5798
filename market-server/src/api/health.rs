//! Health check endpoint

use axum::Json;

/// GET /health - liveness probe
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "market-server",
    }))
}
