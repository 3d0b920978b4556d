use evento::{Aggregator, Executor};
use schedcore_db::table::Schedule as ScheduleTable;
use schedcore_shared::scheduling::{
    ApiFailed, ApiSubmitted, Approved, PendingSchedule, Schedule, Unscheduled,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use ulid::Ulid;

use crate::tasks;

const APPROVER_ACTOR: &str = "scheduler";

#[derive(FromRow)]
struct DisplacedSchedule {
    id: String,
    event_ref_num: i64,
    external_id: Option<String>,
}

async fn find_displaced(
    pool: &SqlitePool,
    employee_id: &str,
    schedule_datetime: i64,
    event_ref_num: i64,
) -> schedcore_shared::Result<Option<DisplacedSchedule>> {
    let statement = Query::select()
        .columns([
            ScheduleTable::Id,
            ScheduleTable::EventRefNum,
            ScheduleTable::ExternalId,
        ])
        .from(ScheduleTable::Table)
        .and_where(Expr::col(ScheduleTable::EmployeeId).eq(employee_id))
        .and_where(Expr::col(ScheduleTable::ScheduleDatetime).eq(schedule_datetime))
        .and_where(Expr::col(ScheduleTable::EventRefNum).not_equals(event_ref_num))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, DisplacedSchedule, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

impl<E: Executor> super::Command<E> {
    /// C6: approves every proposed/edited PendingSchedule for a run,
    /// creating Schedules and enqueuing upstream pushes (§4.5).
    pub async fn approve_run(&self, run_id: &str) -> schedcore_shared::Result<()> {
        let proposals = crate::query::pending_for_run(&self.read_db, run_id).await?;
        let actionable: Vec<_> = proposals
            .into_iter()
            .filter(|row| matches!(row.status.as_str(), "Proposed" | "Edited"))
            .collect();

        for row in actionable {
            let (Some(employee_id), Some(schedule_datetime)) =
                (row.employee_id.clone(), row.schedule_datetime)
            else {
                continue;
            };

            let employee = schedcore_roster::employee::get(&self.read_db, &employee_id).await?;
            let event = schedcore_events::event::get(&self.read_db, row.event_ref_num).await?;

            let missing_field = match (&employee, &event) {
                (Some(employee), Some(event)) => {
                    if employee.external_id.as_deref().unwrap_or("").is_empty() {
                        Some("employee has no external id")
                    } else if event.external_id.as_deref().unwrap_or("").is_empty() {
                        Some("event has no external id")
                    } else if event.location_mvid.as_deref().unwrap_or("").is_empty() {
                        Some("event has no location")
                    } else {
                        None
                    }
                }
                _ => Some("employee or event no longer exists"),
            };

            let pending_version = self
                .current_version(PendingSchedule::aggregator_type(), &row.id)
                .await?;

            if let Some(reason) = missing_field {
                evento::aggregator(&row.id)
                    .original_version(pending_version)
                    .requested_by(APPROVER_ACTOR)
                    .event(&ApiFailed { reason: reason.to_string() })
                    .commit(&self.executor)
                    .await?;
                continue;
            }

            if row.is_swap {
                if let Some(displaced) =
                    find_displaced(&self.read_db, &employee_id, schedule_datetime, row.event_ref_num).await?
                {
                    let displaced_version = self
                        .current_version(Schedule::aggregator_type(), &displaced.id)
                        .await?;

                    evento::aggregator(&displaced.id)
                        .original_version(displaced_version)
                        .requested_by(APPROVER_ACTOR)
                        .event(&Unscheduled)
                        .commit(&self.executor)
                        .await?;
                    schedcore_events::event::set_condition(
                        &self.write_db,
                        displaced.event_ref_num,
                        schedcore_events::event::Condition::Unstaffed,
                        false,
                    )
                    .await?;

                    if let Some(external_id) = displaced.external_id {
                        tasks::enqueue_push_delete(&self.write_db, &external_id).await?;
                    }
                }
            }

            let schedule_id = Ulid::new().to_string();
            self.create_schedule(&schedule_id, row.event_ref_num, &employee_id, schedule_datetime)
                .await?;
            tasks::enqueue_push_new(&self.write_db, &schedule_id).await?;

            evento::aggregator(&row.id)
                .original_version(pending_version)
                .requested_by(APPROVER_ACTOR)
                .event(&Approved)
                .commit(&self.executor)
                .await?;
            evento::aggregator(&row.id)
                .original_version(pending_version + 1)
                .requested_by(APPROVER_ACTOR)
                .event(&ApiSubmitted { schedule_id })
                .commit(&self.executor)
                .await?;
        }

        Ok(())
    }
}
