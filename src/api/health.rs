use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness plus the calculation parameters this instance will apply.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.pipeline.config();
    Json(serde_json::json!({
        "status": "ready",
        "calculation": config.calculation,
        "pageSize": config.page_size,
    }))
}
