use axum::Json;

/// GET / — liveness probe. Never touches the sheet or the tracker.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": format!("ticket-bridge {} is running", env!("CARGO_PKG_VERSION")),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
