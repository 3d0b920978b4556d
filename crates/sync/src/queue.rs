use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use schedcore_db::table::SyncTask as SyncTaskTable;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// Mirrors `schedcore_scheduling::tasks::TaskType` by name only — the sync
/// crate never depends on `schedcore-scheduling` (§4.7/§5), it just reads
/// back the string the producer wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskType {
    PushNew,
    PushUpdate,
    PushDelete,
    PullEvents,
}

impl TaskType {
    fn from_str(value: &str) -> Option<Self> {
        match value {
            "PushNew" => Some(Self::PushNew),
            "PushUpdate" => Some(Self::PushUpdate),
            "PushDelete" => Some(Self::PushDelete),
            "PullEvents" => Some(Self::PullEvents),
            _ => None,
        }
    }

    /// Push tasks give up after three tries (§4.7); a failed pull just
    /// waits for the next hourly tick.
    pub fn max_attempts(&self) -> i64 {
        match self {
            Self::PushNew | Self::PushUpdate | Self::PushDelete => 3,
            Self::PullEvents => 1,
        }
    }
}

#[derive(FromRow)]
struct RawTask {
    id: String,
    task_type: String,
    payload: Vec<u8>,
    attempts: i64,
}

#[derive(Debug)]
pub struct Task {
    pub id: String,
    pub task_type: TaskType,
    pub payload: Vec<u8>,
    pub attempts: i64,
}

/// Pops up to `limit` pending, due tasks oldest-first. A task stays `pending`
/// while it's being worked — the worker marks it terminal or reschedules it
/// explicitly, there is no separate `in_progress` status (single worker loop,
/// §5).
pub async fn dequeue(pool: &SqlitePool, limit: u32) -> schedcore_shared::Result<Vec<Task>> {
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let statement = Query::select()
        .columns([
            SyncTaskTable::Id,
            SyncTaskTable::TaskType,
            SyncTaskTable::Payload,
            SyncTaskTable::Attempts,
        ])
        .from(SyncTaskTable::Table)
        .and_where(Expr::col(SyncTaskTable::Status).eq("pending"))
        .and_where(Expr::col(SyncTaskTable::NotBefore).lte(now))
        .order_by(SyncTaskTable::CreatedAt, Order::Asc)
        .limit(limit as u64)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, RawTask, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            TaskType::from_str(&row.task_type).map(|task_type| Task {
                id: row.id,
                task_type,
                payload: row.payload,
                attempts: row.attempts,
            })
        })
        .collect())
}

pub async fn mark_succeeded(pool: &SqlitePool, task_id: &str) -> schedcore_shared::Result<()> {
    let statement = Query::delete()
        .from_table(SyncTaskTable::Table)
        .and_where(Expr::col(SyncTaskTable::Id).eq(task_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Bumps `attempts`, sets a fresh `not_before` backoff deadline and records
/// `last_error`; the task stays `pending` for the next sweep.
pub async fn mark_retry(
    pool: &SqlitePool,
    task_id: &str,
    attempts: i64,
    backoff_seconds: i64,
    error: &str,
) -> schedcore_shared::Result<()> {
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let statement = Query::update()
        .table(SyncTaskTable::Table)
        .values([
            (SyncTaskTable::Attempts, attempts.into()),
            (SyncTaskTable::NotBefore, (now + backoff_seconds).into()),
            (SyncTaskTable::LastError, error.into()),
            (SyncTaskTable::UpdatedAt, now.into()),
        ])
        .and_where(Expr::col(SyncTaskTable::Id).eq(task_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

#[derive(Debug, Default, serde::Serialize)]
pub struct QueueStatus {
    pub pending: i64,
    pub failed: i64,
}

pub async fn status(pool: &SqlitePool) -> schedcore_shared::Result<QueueStatus> {
    let statement = Query::select()
        .column(SyncTaskTable::Status)
        .expr(Expr::col(SyncTaskTable::Id).count())
        .from(SyncTaskTable::Table)
        .group_by_col(SyncTaskTable::Status)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows: Vec<(String, i64)> = sqlx::query_as_with(&sql, values).fetch_all(pool).await?;

    let mut result = QueueStatus::default();
    for (status, count) in rows {
        match status.as_str() {
            "pending" => result.pending = count,
            "failed" => result.failed = count,
            _ => {}
        }
    }

    Ok(result)
}

pub async fn mark_failed(pool: &SqlitePool, task_id: &str, error: &str) -> schedcore_shared::Result<()> {
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let statement = Query::update()
        .table(SyncTaskTable::Table)
        .values([
            (SyncTaskTable::Status, "failed".into()),
            (SyncTaskTable::LastError, error.into()),
            (SyncTaskTable::UpdatedAt, now.into()),
        ])
        .and_where(Expr::col(SyncTaskTable::Id).eq(task_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
