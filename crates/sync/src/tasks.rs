use schedcore_db::table::SyncTask as SyncTaskTable;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use ulid::Ulid;

/// Sync owns enqueuing its own periodic pull task; the push/delete
/// enqueues live in `schedcore_scheduling::tasks` next to the commands that
/// trigger them, both writing the same `sync_task` table.
pub async fn enqueue_pull_events(pool: &SqlitePool) -> schedcore_shared::Result<String> {
    let id = Ulid::new().to_string();
    let payload = serde_json::to_vec(&serde_json::json!({})).map_err(|err| anyhow::anyhow!(err))?;

    let statement = Query::insert()
        .into_table(SyncTaskTable::Table)
        .columns([SyncTaskTable::Id, SyncTaskTable::TaskType, SyncTaskTable::Payload])
        .values_panic([id.clone().into(), "PullEvents".into(), payload.into()])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(id)
}
