use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use schedcore_roster::rotation;
use schedcore_shared::roster::RotationType;
use schedcore_shared::Error;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use super::RouterState;

fn parse_rotation_type(value: &str) -> Result<RotationType, AppError> {
    RotationType::from_str(value).map_err(|_| AppError(Error::User(format!("unknown rotation type {value}"))))
}

#[derive(Deserialize)]
pub struct RotationTypeQuery {
    rotation_type: String,
}

#[derive(Serialize)]
pub struct RotationView {
    weekly: Vec<rotation::WeeklySlot>,
    exceptions: Vec<rotation::ExceptionRow>,
}

pub async fn get_rotation(
    State(state): State<RouterState>,
    Query(query): Query<RotationTypeQuery>,
) -> Result<Json<RotationView>, AppError> {
    let rotation_type = parse_rotation_type(&query.rotation_type)?;
    let weekly = rotation::list_weekly(&state.app.read_db, rotation_type).await?;
    let exceptions = rotation::list_exceptions(&state.app.read_db, rotation_type).await?;

    Ok(Json(RotationView { weekly, exceptions }))
}

#[derive(Deserialize)]
pub struct PutRotationBody {
    rotation_type: String,
    assignments: HashMap<u8, String>,
}

#[derive(Serialize)]
pub struct PutRotationResponse {
    set: Vec<u8>,
    rejected: Vec<(u8, String)>,
}

pub async fn put_rotation(
    State(state): State<RouterState>,
    Json(body): Json<PutRotationBody>,
) -> Result<Json<PutRotationResponse>, AppError> {
    let rotation_type = parse_rotation_type(&body.rotation_type)?;
    let (set, rejected) = rotation::set_all_weekly(&state.app.write_db, rotation_type, body.assignments).await?;

    Ok(Json(PutRotationResponse { set, rejected }))
}

#[derive(Deserialize)]
pub struct AddExceptionBody {
    rotation_type: String,
    date: String,
    employee_id: String,
    reason: Option<String>,
}

#[derive(Serialize)]
pub struct AddExceptionResponse {
    id: String,
}

pub async fn add_exception(
    State(state): State<RouterState>,
    Json(body): Json<AddExceptionBody>,
) -> Result<Json<AddExceptionResponse>, AppError> {
    let rotation_type = parse_rotation_type(&body.rotation_type)?;
    let date = schedcore_roster::parse_date(&body.date).map_err(AppError)?;
    let id = rotation::add_exception(&state.app.write_db, rotation_type, date, &body.employee_id, body.reason.as_deref())
        .await?;

    Ok(Json(AddExceptionResponse { id }))
}

pub async fn delete_exception(
    State(state): State<RouterState>,
    Path(id): Path<String>,
) -> Result<(), AppError> {
    rotation::delete_exception(&state.app.write_db, &id).await?;
    Ok(())
}
