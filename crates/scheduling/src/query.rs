use schedcore_db::table::{
    PendingSchedule as PendingTable, Schedule as ScheduleTable, SchedulerRunHistory as RunTable,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};

#[derive(Clone, Debug, serde::Serialize, FromRow)]
pub struct RunRow {
    pub id: String,
    pub run_type: String,
    pub state: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub total_processed: i64,
    pub scheduled: i64,
    pub requiring_swaps: i64,
    pub failed: i64,
    pub error_message: Option<String>,
}

fn select_runs() -> sea_query::SelectStatement {
    Query::select()
        .columns([
            RunTable::Id,
            RunTable::RunType,
            RunTable::State,
            RunTable::StartedAt,
            RunTable::EndedAt,
            RunTable::TotalProcessed,
            RunTable::Scheduled,
            RunTable::RequiringSwaps,
            RunTable::Failed,
            RunTable::ErrorMessage,
        ])
        .from(RunTable::Table)
        .to_owned()
}

pub async fn list_runs(pool: &SqlitePool) -> schedcore_shared::Result<Vec<RunRow>> {
    let statement = select_runs()
        .order_by(RunTable::StartedAt, sea_query::Order::Desc)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, RunRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn get_run(pool: &SqlitePool, run_id: &str) -> schedcore_shared::Result<Option<RunRow>> {
    let statement = select_runs()
        .and_where(Expr::col(RunTable::Id).eq(run_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, RunRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

#[derive(Clone, Debug, serde::Serialize, FromRow)]
pub struct PendingRow {
    pub id: String,
    pub run_id: String,
    pub event_ref_num: i64,
    pub employee_id: Option<String>,
    pub schedule_datetime: Option<i64>,
    pub status: String,
    pub is_swap: bool,
    pub swap_reason: Option<String>,
    pub failure_reason: Option<String>,
}

pub(crate) fn select_pending() -> sea_query::SelectStatement {
    Query::select()
        .columns([
            PendingTable::Id,
            PendingTable::RunId,
            PendingTable::EventRefNum,
            PendingTable::EmployeeId,
            PendingTable::ScheduleDatetime,
            PendingTable::Status,
            PendingTable::IsSwap,
            PendingTable::SwapReason,
            PendingTable::FailureReason,
        ])
        .from(PendingTable::Table)
        .to_owned()
}

pub(crate) async fn get_pending(
    pool: &SqlitePool,
    pending_id: &str,
) -> schedcore_shared::Result<Option<PendingRow>> {
    let statement = select_pending()
        .and_where(Expr::col(PendingTable::Id).eq(pending_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, PendingRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub(crate) async fn pending_for_run(
    pool: &SqlitePool,
    run_id: &str,
) -> schedcore_shared::Result<Vec<PendingRow>> {
    let statement = select_pending()
        .and_where(Expr::col(PendingTable::RunId).eq(run_id))
        .order_by(PendingTable::ScheduleDatetime, sea_query::Order::Asc)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, PendingRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

#[derive(Clone, Debug, FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub event_ref_num: i64,
    pub employee_id: String,
    pub schedule_datetime: i64,
    pub sync_status: String,
    pub external_id: Option<String>,
    pub last_synced: Option<i64>,
    pub api_error_details: Option<String>,
}

pub async fn get_schedule(
    pool: &SqlitePool,
    schedule_id: &str,
) -> schedcore_shared::Result<Option<ScheduleRow>> {
    let statement = Query::select()
        .columns([
            ScheduleTable::Id,
            ScheduleTable::EventRefNum,
            ScheduleTable::EmployeeId,
            ScheduleTable::ScheduleDatetime,
            ScheduleTable::SyncStatus,
            ScheduleTable::ExternalId,
            ScheduleTable::LastSynced,
            ScheduleTable::ApiErrorDetails,
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

/// A categorized view of one run's proposals for the review UI (§4.5).
pub struct Proposals {
    pub newly_scheduled: Vec<PendingRow>,
    pub swaps: Vec<PendingRow>,
    pub failed: Vec<PendingRow>,
    pub daily_preview: Vec<PendingRow>,
}

pub async fn list_proposals(pool: &SqlitePool, run_id: &str) -> schedcore_shared::Result<Proposals> {
    let rows = pending_for_run(pool, run_id).await?;
    let daily_preview = rows.clone();

    let mut newly_scheduled = Vec::new();
    let mut swaps = Vec::new();
    let mut failed = Vec::new();

    for row in rows {
        if row.failure_reason.is_some() {
            failed.push(row);
        } else if row.is_swap {
            swaps.push(row);
        } else {
            newly_scheduled.push(row);
        }
    }

    Ok(Proposals {
        newly_scheduled,
        swaps,
        failed,
        daily_preview,
    })
}
