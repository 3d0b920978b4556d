use axum::extract::{Path, State};
use axum::Json;
use schedcore_scheduling::{query, Command, ProposalEdit};
use schedcore_shared::scheduling::RunType;
use schedcore_shared::Error;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use super::RouterState;

#[derive(Deserialize, Default)]
pub struct RunBody {
    #[serde(default)]
    run_type: Option<RunType>,
}

#[derive(Serialize)]
pub struct RunIdResponse {
    run_id: String,
}

pub async fn run(State(state): State<RouterState>, Json(body): Json<RunBody>) -> Result<Json<RunIdResponse>, AppError> {
    let command = Command::new(state.app.clone());
    let run_id = command.run(body.run_type.unwrap_or(RunType::Manual)).await?;

    Ok(Json(RunIdResponse { run_id }))
}

#[derive(Serialize)]
pub struct RunDetail {
    run: query::RunRow,
    newly_scheduled: Vec<query::PendingRow>,
    swaps: Vec<query::PendingRow>,
    failed: Vec<query::PendingRow>,
}

pub async fn get_run(State(state): State<RouterState>, Path(id): Path<String>) -> Result<Json<RunDetail>, AppError> {
    let Some(run) = query::get_run(&state.app.read_db, &id).await? else {
        return Err(AppError(Error::NotFound("run not found".to_string())));
    };
    let proposals = query::list_proposals(&state.app.read_db, &id).await?;

    Ok(Json(RunDetail {
        run,
        newly_scheduled: proposals.newly_scheduled,
        swaps: proposals.swaps,
        failed: proposals.failed,
    }))
}

#[derive(Deserialize)]
pub struct EditProposalBody {
    employee_id: Option<String>,
    schedule_datetime: Option<i64>,
}

pub async fn edit_proposal(
    State(state): State<RouterState>,
    Path(id): Path<String>,
    Json(body): Json<EditProposalBody>,
) -> Result<(), AppError> {
    let command = Command::new(state.app.clone());
    command
        .edit_proposal(
            &id,
            ProposalEdit {
                employee_id: body.employee_id,
                schedule_datetime: body.schedule_datetime,
            },
        )
        .await?;

    Ok(())
}

pub async fn approve(State(state): State<RouterState>, Path(id): Path<String>) -> Result<(), AppError> {
    Command::new(state.app.clone()).approve_run(&id).await?;
    Ok(())
}

pub async fn reject(State(state): State<RouterState>, Path(id): Path<String>) -> Result<(), AppError> {
    Command::new(state.app.clone()).reject_run(&id).await?;
    Ok(())
}
