use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use super::RouterState;

/// GET /health - liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /ready - readiness probe; checks the read pool is reachable.
pub async fn ready(State(state): State<RouterState>) -> (axum::http::StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").fetch_one(&state.app.read_db).await {
        Ok(_) => (axum::http::StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::error!(err = %err, "readiness check failed");
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health().await;
        assert_eq!(response.0["status"], "ok");
    }
}
