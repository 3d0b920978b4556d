use axum::extract::{Path, State};
use axum::Json;
use schedcore_scheduling::Command;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use super::RouterState;

#[derive(Deserialize)]
pub struct CreateBody {
    event_ref_num: i64,
    employee_id: String,
    schedule_datetime: i64,
}

#[derive(Serialize)]
pub struct ScheduleIdResponse {
    schedule_id: String,
}

pub async fn create(
    State(state): State<RouterState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<ScheduleIdResponse>, AppError> {
    let command = Command::new(state.app.clone());
    let schedule_id = command
        .create(body.event_ref_num, &body.employee_id, body.schedule_datetime)
        .await?;

    Ok(Json(ScheduleIdResponse { schedule_id }))
}

#[derive(Deserialize)]
pub struct RescheduleBody {
    schedule_datetime: i64,
}

pub async fn reschedule(
    State(state): State<RouterState>,
    Path(id): Path<String>,
    Json(body): Json<RescheduleBody>,
) -> Result<(), AppError> {
    Command::new(state.app.clone()).reschedule(&id, body.schedule_datetime).await?;
    Ok(())
}

#[derive(Deserialize)]
pub struct EmployeeBody {
    employee_id: String,
}

pub async fn trade(
    State(state): State<RouterState>,
    Path(id): Path<String>,
    Json(body): Json<EmployeeBody>,
) -> Result<(), AppError> {
    Command::new(state.app.clone()).trade(&id, &body.employee_id).await?;
    Ok(())
}

pub async fn change_employee(
    State(state): State<RouterState>,
    Path(id): Path<String>,
    Json(body): Json<EmployeeBody>,
) -> Result<(), AppError> {
    Command::new(state.app.clone()).change_employee(&id, &body.employee_id).await?;
    Ok(())
}

pub async fn unschedule(State(state): State<RouterState>, Path(id): Path<String>) -> Result<(), AppError> {
    Command::new(state.app.clone()).unschedule(&id).await?;
    Ok(())
}
