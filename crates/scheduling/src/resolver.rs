use schedcore_db::table::{RetailEvent as EventTable, Schedule as ScheduleTable};
use schedcore_events::RetailEvent;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use time::{Date, OffsetDateTime};

use crate::constraint;

#[derive(Clone, Debug, FromRow)]
pub struct BumpCandidate {
    pub schedule_id: String,
    pub event_ref_num: i64,
    pub employee_id: String,
    pub schedule_datetime: i64,
    pub due_datetime: i64,
}

impl BumpCandidate {
    pub fn urgency(&self, reference: Date) -> schedcore_shared::Result<i64> {
        let due = OffsetDateTime::from_unix_timestamp(self.due_datetime)?.date();
        Ok((due - reference).whole_days())
    }
}

pub struct SwapProposal {
    pub incoming_event_ref_num: i64,
    pub displaced_schedule_id: String,
    pub displaced_event_ref_num: i64,
    pub displaced_employee_id: String,
    pub displaced_schedule_datetime: i64,
    pub explanation: String,
}

/// Candidates for (date, optional employee) sorted least-urgent first,
/// excluding Supervisor events and those due in under two days (§4.3).
pub async fn bumpable(
    pool: &SqlitePool,
    date: Date,
    employee_id: Option<&str>,
    reference: Date,
) -> schedcore_shared::Result<Vec<BumpCandidate>> {
    let mut statement = Query::select()
        .column((ScheduleTable::Table, ScheduleTable::Id))
        .column((ScheduleTable::Table, ScheduleTable::EventRefNum))
        .column((ScheduleTable::Table, ScheduleTable::EmployeeId))
        .column((ScheduleTable::Table, ScheduleTable::ScheduleDatetime))
        .column((EventTable::Table, EventTable::DueDatetime))
        .from(ScheduleTable::Table)
        .join(
            sea_query::JoinType::InnerJoin,
            EventTable::Table,
            Expr::col((ScheduleTable::Table, ScheduleTable::EventRefNum))
                .equals((EventTable::Table, EventTable::ProjectRefNum)),
        )
        .and_where(
            Expr::col((EventTable::Table, EventTable::EventType)).not_equals("Supervisor"),
        )
        .to_owned();

    if let Some(employee_id) = employee_id {
        statement.and_where(Expr::col((ScheduleTable::Table, ScheduleTable::EmployeeId)).eq(employee_id));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, BumpCandidate, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    let day_start = OffsetDateTime::new_utc(date, time::Time::MIDNIGHT).unix_timestamp();
    let day_end = OffsetDateTime::new_utc(date, time::Time::from_hms(23, 59, 59)?).unix_timestamp();

    let mut candidates: Vec<BumpCandidate> = rows
        .into_iter()
        .filter(|row| row.schedule_datetime >= day_start && row.schedule_datetime <= day_end)
        .filter(|row| row.urgency(reference).map(|u| u >= 2).unwrap_or(false))
        .collect();

    candidates.sort_by(|a, b| {
        let a_urgency = a.urgency(reference).unwrap_or(0);
        let b_urgency = b.urgency(reference).unwrap_or(0);
        b_urgency.cmp(&a_urgency)
    });

    Ok(candidates)
}

/// The most-bumpable schedule whose event's urgency is strictly greater
/// than `incoming_urgency` (§4.3).
pub async fn resolve(
    pool: &SqlitePool,
    incoming: &RetailEvent,
    date: Date,
    employee_id: Option<&str>,
    reference: Date,
) -> schedcore_shared::Result<Option<SwapProposal>> {
    let incoming_urgency = schedcore_events::event::urgency(incoming, reference);
    let candidates = bumpable(pool, date, employee_id, reference).await?;

    let chosen = candidates
        .into_iter()
        .find(|candidate| candidate.urgency(reference).unwrap_or(i64::MIN) > incoming_urgency);

    Ok(chosen.map(|candidate| SwapProposal {
        incoming_event_ref_num: incoming.project_ref_num,
        explanation: format!(
            "bumped event {} (due in {} days) to schedule more urgent event {} (due in {} days)",
            candidate.event_ref_num,
            candidate.urgency(reference).unwrap_or_default(),
            incoming.project_ref_num,
            incoming_urgency,
        ),
        displaced_schedule_id: candidate.schedule_id,
        displaced_event_ref_num: candidate.event_ref_num,
        displaced_employee_id: candidate.employee_id,
        displaced_schedule_datetime: candidate.schedule_datetime,
    }))
}

/// Working dates in [event.start, event.due] other than `exclude` with no
/// hard violation for (event, employee, default time) (§4.3).
pub async fn alternative_dates(
    pool: &SqlitePool,
    event: &RetailEvent,
    employee: &schedcore_roster::employee::Employee,
    exclude: Date,
    default_time: time::Time,
) -> schedcore_shared::Result<Vec<Date>> {
    let start = event.start()?.date();
    let due = event.due()?.date();
    let mut dates = Vec::new();
    let mut date = start;

    while date <= due {
        if date != exclude {
            let datetime = OffsetDateTime::new_utc(date, default_time);
            if constraint::hard_violations(pool, event, employee, datetime).await?.is_empty() {
                dates.push(date);
            }
        }
        date = date.next_day().ok_or_else(|| {
            schedcore_shared::Error::Server(anyhow::anyhow!("date overflow walking alternative dates"))
        })?;
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn bump_candidate_urgency_counts_whole_days() {
        let due = OffsetDateTime::new_utc(date!(2026 - 08 - 05), time::Time::MIDNIGHT).unix_timestamp();
        let candidate = BumpCandidate {
            schedule_id: "sched-1".to_string(),
            event_ref_num: 1,
            employee_id: "emp-1".to_string(),
            schedule_datetime: 0,
            due_datetime: due,
        };

        assert_eq!(candidate.urgency(date!(2026 - 07 - 28)).unwrap(), 8);
    }
}
