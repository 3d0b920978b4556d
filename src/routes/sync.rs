use axum::extract::State;
use axum::Json;
use schedcore_sync::queue::{self, QueueStatus};
use serde_json::{json, Value};

use crate::error::AppError;
use super::RouterState;

/// GET /sync/health - pings the upstream session, not just our own process.
pub async fn health(State(state): State<RouterState>) -> Json<Value> {
    Json(json!({ "upstream_reachable": state.client.health_check().await }))
}

#[derive(serde::Serialize)]
pub struct TriggerResponse {
    processed: u32,
}

/// POST /sync/trigger - runs one worker pass outside the regular poll interval.
pub async fn trigger(State(state): State<RouterState>) -> Result<Json<TriggerResponse>, AppError> {
    let processed = state.worker.run_once(50).await?;
    Ok(Json(TriggerResponse { processed }))
}

pub async fn status(State(state): State<RouterState>) -> Result<Json<QueueStatus>, AppError> {
    let status = queue::status(&state.app.write_db).await?;
    Ok(Json(status))
}
