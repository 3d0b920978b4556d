use schedcore_db::table::SyncTask as SyncTaskTable;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::SqlitePool;
use strum::AsRefStr;
use ulid::Ulid;

/// The four task families of §4.7. Each enqueue carries only the identifiers
/// the worker needs to re-read current state at execution time (§5) — never
/// the mutated fields themselves.
#[derive(Clone, Copy, Debug, AsRefStr)]
pub enum TaskType {
    PushNew,
    PushUpdate,
    PushDelete,
    PullEvents,
}

#[derive(Serialize)]
struct SchedulePayload<'a> {
    schedule_id: &'a str,
}

#[derive(Serialize)]
struct DeletePayload<'a> {
    external_id: &'a str,
}

async fn enqueue(
    pool: &SqlitePool,
    task_type: TaskType,
    payload: &impl Serialize,
) -> schedcore_shared::Result<String> {
    let id = Ulid::new().to_string();
    let payload = serde_json::to_vec(payload).map_err(|err| anyhow::anyhow!(err))?;

    let statement = Query::insert()
        .into_table(SyncTaskTable::Table)
        .columns([
            SyncTaskTable::Id,
            SyncTaskTable::TaskType,
            SyncTaskTable::Payload,
        ])
        .values_panic([id.clone().into(), task_type.as_ref().into(), payload.into()])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(id)
}

pub async fn enqueue_push_new(
    pool: &SqlitePool,
    schedule_id: &str,
) -> schedcore_shared::Result<String> {
    enqueue(pool, TaskType::PushNew, &SchedulePayload { schedule_id }).await
}

pub async fn enqueue_push_update(
    pool: &SqlitePool,
    schedule_id: &str,
) -> schedcore_shared::Result<String> {
    enqueue(pool, TaskType::PushUpdate, &SchedulePayload { schedule_id }).await
}

pub async fn enqueue_push_delete(
    pool: &SqlitePool,
    external_id: &str,
) -> schedcore_shared::Result<String> {
    enqueue(pool, TaskType::PushDelete, &DeletePayload { external_id }).await
}

pub async fn enqueue_pull_events(pool: &SqlitePool) -> schedcore_shared::Result<String> {
    enqueue(pool, TaskType::PullEvents, &serde_json::json!({})).await
}
