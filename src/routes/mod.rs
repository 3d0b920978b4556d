//! The JSON HTTP surface (§6, §10.4).

pub mod auto_schedule;
pub mod health;
pub mod rotations;
pub mod schedules;
pub mod sync;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use schedcore_sync::{ReqwestUpstreamClient, Worker};

use crate::state::AppState;

#[derive(Clone)]
pub struct RouterState {
    pub app: AppState,
    pub client: Arc<ReqwestUpstreamClient>,
    pub worker: Arc<Worker<evento::sql::RwSqlite, ReqwestUpstreamClient>>,
}

pub fn router(
    app: AppState,
    client: Arc<ReqwestUpstreamClient>,
    worker: Arc<Worker<evento::sql::RwSqlite, ReqwestUpstreamClient>>,
) -> Router {
    let state = RouterState { app, client, worker };

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/rotations", get(rotations::get_rotation).put(rotations::put_rotation))
        .route("/rotations/exceptions", post(rotations::add_exception))
        .route("/rotations/exceptions/{id}", delete(rotations::delete_exception))
        .route("/auto-schedule/run", post(auto_schedule::run))
        .route("/auto-schedule/runs/{id}", get(auto_schedule::get_run))
        .route("/auto-schedule/proposals/{id}", put(auto_schedule::edit_proposal))
        .route("/auto-schedule/runs/{id}/approve", post(auto_schedule::approve))
        .route("/auto-schedule/runs/{id}/reject", post(auto_schedule::reject))
        .route("/schedules", post(schedules::create))
        .route("/schedules/{id}/reschedule", post(schedules::reschedule))
        .route("/schedules/{id}/trade", post(schedules::trade))
        .route("/schedules/{id}/change-employee", post(schedules::change_employee))
        .route("/schedules/{id}", delete(schedules::unschedule))
        .route("/sync/health", get(sync::health))
        .route("/sync/trigger", post(sync::trigger))
        .route("/sync/status", get(sync::status))
        .with_state(state)
}
