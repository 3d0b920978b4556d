mod approve;
mod change_employee;
mod create;
mod edit_proposal;
mod reject;
mod reschedule;
mod run;
mod trade;
mod unschedule;

pub use approve::*;
pub use change_employee::*;
pub use create::*;
pub use edit_proposal::*;
pub use reject::*;
pub use reschedule::*;
pub use run::*;
pub use trade::*;
pub use unschedule::*;

use std::ops::Deref;

use evento::{
    Aggregator, Executor, ReadAggregator,
    cursor::Args,
    metadata::Event,
    subscription::{Context, SubscriptionBuilder},
};
use schedcore_db::table::{
    PendingSchedule as PendingTable, Schedule as ScheduleTable,
    SchedulerRunHistory as RunHistoryTable,
};
use schedcore_shared::scheduling::{
    ApiFailed, ApiSubmitted, Approved, Created, Edited, EmployeeChanged, Proposed, Rejected,
    Rescheduled, Started, Succeeded, Synced, SyncFailed, SyncRetryRequested, Traded, Unscheduled,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

pub struct Command<E: Executor> {
    pub(crate) state: schedcore_shared::State<E>,
}

impl<E: Executor> Deref for Command<E> {
    type Target = schedcore_shared::State<E>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl<E: Executor> Command<E> {
    pub fn new(state: schedcore_shared::State<E>) -> Self {
        Self { state }
    }

    /// Last committed version for an aggregate, 0 if it has never been
    /// written, for commands that mutate a long-lived aggregate more than
    /// once over its lifetime (§4.5).
    pub(crate) async fn current_version(
        &self,
        aggregator_type: &str,
        id: &str,
    ) -> schedcore_shared::Result<u32> {
        let last_event = self
            .executor
            .read(
                Some(vec![ReadAggregator::id(aggregator_type, id)]),
                None,
                Args::backward(1, None),
            )
            .await?;

        Ok(last_event.edges.first().map(|e| e.node.version).unwrap_or_default())
    }
}

pub fn subscription<E: Executor>() -> SubscriptionBuilder<E> {
    SubscriptionBuilder::new("scheduling-command")
        .handler(handle_run_started())
        .handler(handle_run_succeeded())
        .handler(handle_run_failed())
        .handler(handle_pending_proposed())
        .handler(handle_pending_edited())
        .handler(handle_pending_approved())
        .handler(handle_pending_rejected())
        .handler(handle_pending_api_submitted())
        .handler(handle_pending_api_failed())
        .handler(handle_schedule_created())
        .handler(handle_schedule_rescheduled())
        .handler(handle_schedule_traded())
        .handler(handle_schedule_employee_changed())
        .handler(handle_schedule_unscheduled())
        .handler(handle_schedule_synced())
        .handler(handle_schedule_sync_failed())
        .handler(handle_schedule_sync_retry_requested())
}

#[evento::sub_handler]
async fn handle_run_started<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Started>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::insert()
        .into_table(RunHistoryTable::Table)
        .columns([
            RunHistoryTable::Id,
            RunHistoryTable::RunType,
            RunHistoryTable::State,
            RunHistoryTable::StartedAt,
            RunHistoryTable::TotalProcessed,
            RunHistoryTable::Scheduled,
            RunHistoryTable::RequiringSwaps,
            RunHistoryTable::Failed,
            RunHistoryTable::Version,
        ])
        .values_panic([
            event.aggregator_id.to_owned().into(),
            event.data.run_type.to_string().into(),
            "Running".into(),
            event.data.started_at.into(),
            0.into(),
            0.into(),
            0.into(),
            0.into(),
            1.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_run_succeeded<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Succeeded>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(RunHistoryTable::Table)
        .value(RunHistoryTable::State, "Success")
        .value(RunHistoryTable::EndedAt, event.data.ended_at)
        .value(RunHistoryTable::TotalProcessed, event.data.total_processed)
        .value(RunHistoryTable::Scheduled, event.data.scheduled)
        .value(RunHistoryTable::RequiringSwaps, event.data.requiring_swaps)
        .value(RunHistoryTable::Failed, event.data.failed)
        .value(RunHistoryTable::Version, Expr::col(RunHistoryTable::Version).add(1))
        .and_where(Expr::col(RunHistoryTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_run_failed<E: Executor>(
    context: &Context<'_, E>,
    event: Event<schedcore_shared::scheduling::Failed>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(RunHistoryTable::Table)
        .value(RunHistoryTable::State, "Failed")
        .value(RunHistoryTable::EndedAt, event.data.ended_at)
        .value(RunHistoryTable::ErrorMessage, event.data.error_message)
        .value(RunHistoryTable::Version, Expr::col(RunHistoryTable::Version).add(1))
        .and_where(Expr::col(RunHistoryTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_pending_proposed<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Proposed>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::insert()
        .into_table(PendingTable::Table)
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
            PendingTable::Version,
        ])
        .values_panic([
            event.aggregator_id.to_owned().into(),
            event.data.run_id.into(),
            event.data.event_ref_num.into(),
            event.data.employee_id.into(),
            event.data.schedule_datetime.into(),
            "Proposed".into(),
            event.data.is_swap.into(),
            event.data.swap_reason.into(),
            event.data.failure_reason.into(),
            1.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_pending_edited<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Edited>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(PendingTable::Table)
        .value(PendingTable::EmployeeId, event.data.employee_id)
        .value(PendingTable::ScheduleDatetime, event.data.schedule_datetime)
        .value(PendingTable::Status, "Edited")
        .value(PendingTable::Version, Expr::col(PendingTable::Version).add(1))
        .and_where(Expr::col(PendingTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_pending_approved<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Approved>,
) -> anyhow::Result<()> {
    update_pending_status(context.extract::<SqlitePool>(), &event.aggregator_id, "Approved").await
}

#[evento::sub_handler]
async fn handle_pending_rejected<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Rejected>,
) -> anyhow::Result<()> {
    update_pending_status(context.extract::<SqlitePool>(), &event.aggregator_id, "Rejected").await
}

#[evento::sub_handler]
async fn handle_pending_api_submitted<E: Executor>(
    context: &Context<'_, E>,
    event: Event<ApiSubmitted>,
) -> anyhow::Result<()> {
    update_pending_status(context.extract::<SqlitePool>(), &event.aggregator_id, "ApiSubmitted").await
}

#[evento::sub_handler]
async fn handle_pending_api_failed<E: Executor>(
    context: &Context<'_, E>,
    event: Event<ApiFailed>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(PendingTable::Table)
        .value(PendingTable::Status, "ApiFailed")
        .value(PendingTable::FailureReason, event.data.reason)
        .value(PendingTable::Version, Expr::col(PendingTable::Version).add(1))
        .and_where(Expr::col(PendingTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

async fn update_pending_status(pool: SqlitePool, id: &str, status: &str) -> anyhow::Result<()> {
    let statement = Query::update()
        .table(PendingTable::Table)
        .value(PendingTable::Status, status)
        .value(PendingTable::Version, Expr::col(PendingTable::Version).add(1))
        .and_where(Expr::col(PendingTable::Id).eq(id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_created<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Created>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::insert()
        .into_table(ScheduleTable::Table)
        .columns([
            ScheduleTable::Id,
            ScheduleTable::EventRefNum,
            ScheduleTable::EmployeeId,
            ScheduleTable::ScheduleDatetime,
            ScheduleTable::SyncStatus,
            ScheduleTable::Version,
        ])
        .values_panic([
            event.aggregator_id.to_owned().into(),
            event.data.event_ref_num.into(),
            event.data.employee_id.into(),
            event.data.schedule_datetime.into(),
            "Pending".into(),
            1.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_rescheduled<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Rescheduled>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(ScheduleTable::Table)
        .value(ScheduleTable::ScheduleDatetime, event.data.schedule_datetime)
        .value(ScheduleTable::SyncStatus, "Pending")
        .value(ScheduleTable::Version, Expr::col(ScheduleTable::Version).add(1))
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_traded<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Traded>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(ScheduleTable::Table)
        .value(ScheduleTable::EmployeeId, event.data.employee_id)
        .value(ScheduleTable::SyncStatus, "Pending")
        .value(ScheduleTable::Version, Expr::col(ScheduleTable::Version).add(1))
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_employee_changed<E: Executor>(
    context: &Context<'_, E>,
    event: Event<EmployeeChanged>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(ScheduleTable::Table)
        .value(ScheduleTable::EmployeeId, event.data.employee_id)
        .value(ScheduleTable::SyncStatus, "Pending")
        .value(ScheduleTable::Version, Expr::col(ScheduleTable::Version).add(1))
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_unscheduled<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Unscheduled>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::delete()
        .from_table(ScheduleTable::Table)
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_synced<E: Executor>(
    context: &Context<'_, E>,
    event: Event<Synced>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(ScheduleTable::Table)
        .value(ScheduleTable::SyncStatus, "Synced")
        .value(ScheduleTable::ExternalId, event.data.external_id)
        .value(ScheduleTable::Version, Expr::col(ScheduleTable::Version).add(1))
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_sync_failed<E: Executor>(
    context: &Context<'_, E>,
    event: Event<SyncFailed>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(ScheduleTable::Table)
        .value(ScheduleTable::SyncStatus, "Failed")
        .value(ScheduleTable::ApiErrorDetails, event.data.api_error_details)
        .value(ScheduleTable::Version, Expr::col(ScheduleTable::Version).add(1))
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}

#[evento::sub_handler]
async fn handle_schedule_sync_retry_requested<E: Executor>(
    context: &Context<'_, E>,
    event: Event<SyncRetryRequested>,
) -> anyhow::Result<()> {
    let pool = context.extract::<SqlitePool>();

    let statement = Query::update()
        .table(ScheduleTable::Table)
        .value(ScheduleTable::SyncStatus, "Pending")
        .value(ScheduleTable::Version, Expr::col(ScheduleTable::Version).add(1))
        .and_where(Expr::col(ScheduleTable::Id).eq(&event.aggregator_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&pool).await?;

    Ok(())
}
