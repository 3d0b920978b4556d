use evento::{Aggregator, Executor, ReadAggregator, cursor::Args};
use schedcore_db::table::Schedule as ScheduleTable;
use schedcore_shared::scheduling::{Schedule, Synced, SyncFailed, SyncRetryRequested};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};

const SYNC_ACTOR: &str = "sync-worker";

#[derive(Clone, Debug, FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub event_ref_num: i64,
    pub employee_id: String,
    pub schedule_datetime: i64,
    pub sync_status: String,
    pub external_id: Option<String>,
}

/// The worker re-reads this at execution start (§5) rather than trusting
/// whatever the task payload captured at enqueue time.
pub async fn get(pool: &SqlitePool, schedule_id: &str) -> schedcore_shared::Result<Option<ScheduleRow>> {
    let statement = Query::select()
        .columns([
            ScheduleTable::Id,
            ScheduleTable::EventRefNum,
            ScheduleTable::EmployeeId,
            ScheduleTable::ScheduleDatetime,
            ScheduleTable::SyncStatus,
            ScheduleTable::ExternalId,
        ])
        .from(ScheduleTable::Table)
        .and_where(Expr::col(ScheduleTable::Id).eq(schedule_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, ScheduleRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

async fn current_version<E: Executor>(executor: &E, id: &str) -> schedcore_shared::Result<u32> {
    let last_event = executor
        .read(
            Some(vec![ReadAggregator::id(Schedule::aggregator_type(), id)]),
            None,
            Args::backward(1, None),
        )
        .await?;

    Ok(last_event.edges.first().map(|e| e.node.version).unwrap_or_default())
}

pub async fn mark_synced<E: Executor>(
    executor: &E,
    schedule_id: &str,
    external_id: Option<String>,
) -> schedcore_shared::Result<()> {
    let version = current_version(executor, schedule_id).await?;
    evento::aggregator(schedule_id)
        .original_version(version)
        .requested_by(SYNC_ACTOR)
        .event(&Synced { external_id })
        .commit(executor)
        .await?;

    Ok(())
}

pub async fn mark_sync_failed<E: Executor>(
    executor: &E,
    schedule_id: &str,
    api_error_details: &str,
) -> schedcore_shared::Result<()> {
    let version = current_version(executor, schedule_id).await?;
    evento::aggregator(schedule_id)
        .original_version(version)
        .requested_by(SYNC_ACTOR)
        .event(&SyncFailed { api_error_details: api_error_details.to_string() })
        .commit(executor)
        .await?;

    Ok(())
}

pub async fn mark_retry_requested<E: Executor>(
    executor: &E,
    schedule_id: &str,
) -> schedcore_shared::Result<()> {
    let version = current_version(executor, schedule_id).await?;
    evento::aggregator(schedule_id)
        .original_version(version)
        .requested_by(SYNC_ACTOR)
        .event(&SyncRetryRequested)
        .commit(executor)
        .await?;

    Ok(())
}
