// handlers/health.rs - GET /health

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use crate::handlers::AppState;
use crate::store::TreePath;

const PROBE_ID: &str = "__health";

/// Probes the store with a single-document read; a missing document still
/// proves the store answered.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.get_one(&TreePath::classes(), PROBE_ID).await {
        Ok(_) => healthy(now),
        Err(e) if e.is_not_found() => healthy(now),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "document store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store_error": e.to_string()
                    }
                })),
            )
        }
    }
}

fn healthy(now: chrono::DateTime<chrono::Utc>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            }
        })),
    )
}
