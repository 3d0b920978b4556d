use std::collections::HashMap;

use evento::Executor;
use schedcore_db::table::{
    RetailEvent as EventTable, Schedule as ScheduleTable, SchedulerLock as LockTable,
};
use schedcore_events::{RetailEvent, event};
use schedcore_roster::{employee::Employee, rotation};
use schedcore_shared::roster::RotationType;
use schedcore_shared::scheduling::{EventType, Failed, RunType, Started, Succeeded};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use time::{Date, OffsetDateTime, Time};
use ulid::Ulid;

use crate::constraint::{self, Violation};
use crate::resolver;

const SCHEDULING_WINDOW_DAYS: i64 = 21;
const CORE_SLOTS: [(u8, u8); 4] = [(9, 45), (10, 30), (11, 0), (11, 30)];
const SCHEDULER_ACTOR: &str = "scheduler";

/// An outcome for one window event, ready to become a `Proposed` PendingSchedule.
struct Outcome {
    event_ref_num: i64,
    employee_id: Option<String>,
    schedule_datetime: Option<i64>,
    is_swap: bool,
    swap_reason: Option<String>,
    failure_reason: Option<String>,
}

impl Outcome {
    fn success(event_ref_num: i64, employee_id: &str, datetime: OffsetDateTime) -> Self {
        Self {
            event_ref_num,
            employee_id: Some(employee_id.to_owned()),
            schedule_datetime: Some(datetime.unix_timestamp()),
            is_swap: false,
            swap_reason: None,
            failure_reason: None,
        }
    }

    fn swap(event_ref_num: i64, employee_id: &str, datetime: i64, reason: String) -> Self {
        Self {
            event_ref_num,
            employee_id: Some(employee_id.to_owned()),
            schedule_datetime: Some(datetime),
            is_swap: true,
            swap_reason: Some(reason),
            failure_reason: None,
        }
    }

    fn failure(event_ref_num: i64, reason: String) -> Self {
        Self {
            event_ref_num,
            employee_id: None,
            schedule_datetime: None,
            is_swap: false,
            swap_reason: None,
            failure_reason: Some(reason),
        }
    }
}

fn default_time(event_type: EventType) -> Time {
    let (h, m) = match event_type {
        EventType::Juicer | EventType::DigitalSetup => (9, 0),
        EventType::DigitalRefresh | EventType::Freeosk => (10, 0),
        EventType::DigitalTeardown => (15, 0),
        EventType::Supervisor | EventType::Other => (12, 0),
        EventType::Core | EventType::Digitals => (12, 0),
    };
    Time::from_hms(h, m, 0).expect("fixed default times are valid")
}

async fn acquire_lock(pool: &SqlitePool, run_id: &str) -> schedcore_shared::Result<bool> {
    let statement = Query::update()
        .table(LockTable::Table)
        .value(LockTable::Locked, true)
        .value(LockTable::RunId, run_id)
        .value(LockTable::LockedAt, OffsetDateTime::now_utc().unix_timestamp())
        .and_where(Expr::col(LockTable::Id).eq(1))
        .and_where(Expr::col(LockTable::Locked).eq(false))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() == 1)
}

async fn release_lock(pool: &SqlitePool) -> schedcore_shared::Result<()> {
    let statement = Query::update()
        .table(LockTable::Table)
        .value(LockTable::Locked, false)
        .value(LockTable::RunId, Option::<String>::None)
        .and_where(Expr::col(LockTable::Id).eq(1))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Active employees satisfying the role requirement of `event_type`, id ascending.
async fn role_eligible(
    pool: &SqlitePool,
    event_type: EventType,
) -> schedcore_shared::Result<Vec<Employee>> {
    let employees = schedcore_roster::employee::list_active(pool).await?;
    Ok(employees
        .into_iter()
        .filter(|employee| {
            let job_title = employee.job_title();
            if event_type.requires_juicer_barista() {
                job_title.may_work_juicer()
            } else if event_type.requires_lead_or_supervisor() {
                job_title.may_work_lead_role()
            } else {
                true
            }
        })
        .collect())
}

async fn club_supervisor(pool: &SqlitePool) -> schedcore_shared::Result<Option<Employee>> {
    let employees = schedcore_roster::employee::list_active(pool).await?;
    Ok(employees
        .into_iter()
        .find(|employee| employee.job_title().is_club_supervisor()))
}

/// Phase 1 — rotation events (Juicer, Digital Setup/Refresh, Freeosk, Digital
/// Teardown). Designated employee first, then role-eligible fallback, then
/// the Club Supervisor (§4.4).
async fn schedule_rotation_event(
    pool: &SqlitePool,
    event: &RetailEvent,
) -> schedcore_shared::Result<Outcome> {
    let event_type = event.event_type();
    let time = default_time(event_type);
    let start = event.start()?.date();
    let due = event.due()?.date();

    let rotation_type = match event_type {
        EventType::Juicer => Some(RotationType::PrimaryJuicer),
        EventType::DigitalSetup | EventType::DigitalRefresh | EventType::Freeosk => {
            Some(RotationType::PrimaryLead)
        }
        EventType::DigitalTeardown => None,
        _ => unreachable!("schedule_rotation_event called with a non-Phase-1 event type"),
    };

    let mut target_date = start;
    let mut designated: Option<String> = None;
    let mut blocking = Vec::new();

    if matches!(event_type, EventType::DigitalTeardown) {
        target_date = start;
        designated = rotation::secondary_lead_for(pool, start).await?;
    } else if let Some(rotation_type) = rotation_type {
        let mut date = start;
        loop {
            if let Some(candidate_id) = rotation::rotation_for(pool, rotation_type, date).await? {
                if let Some(candidate) = schedcore_roster::employee::get(pool, &candidate_id).await? {
                    let datetime = OffsetDateTime::new_utc(date, time);
                    let violations = constraint::hard_violations(pool, event, &candidate, datetime).await?;
                    if violations.is_empty() {
                        target_date = date;
                        designated = Some(candidate_id);
                        break;
                    }
                    if date == start {
                        blocking = violations;
                    }
                }
            }
            if date >= due {
                target_date = start;
                break;
            }
            date = date.next_day().ok_or_else(|| {
                schedcore_shared::Error::Server(anyhow::anyhow!("date overflow in rotation search"))
            })?;
        }
    }

    let datetime = OffsetDateTime::new_utc(target_date, time);

    if let Some(employee_id) = &designated {
        if let Some(employee) = schedcore_roster::employee::get(pool, employee_id).await? {
            if constraint::hard_violations(pool, event, &employee, datetime).await?.is_empty() {
                return Ok(Outcome::success(event.project_ref_num, employee_id, datetime));
            }
        }
    }

    // Fallback (a): any other active employee satisfying the role requirement.
    for candidate in role_eligible(pool, event_type).await? {
        if designated.as_deref() == Some(candidate.id.as_str()) {
            continue;
        }
        let violations = constraint::hard_violations(pool, event, &candidate, datetime).await?;
        if violations.is_empty() {
            return Ok(Outcome::success(event.project_ref_num, &candidate.id, datetime));
        }
        if blocking.is_empty() {
            blocking = violations;
        }
    }

    // Fallback (b): the Club Supervisor at the event's default time.
    if let Some(supervisor) = club_supervisor(pool).await? {
        let violations = constraint::hard_violations(pool, event, &supervisor, datetime).await?;
        if violations.is_empty() {
            return Ok(Outcome::success(event.project_ref_num, &supervisor.id, datetime));
        }
        if blocking.is_empty() {
            blocking = violations;
        }
    }

    let reason = blocking
        .first()
        .map(Violation::description)
        .unwrap_or("no eligible employee")
        .to_string();

    Ok(Outcome::failure(event.project_ref_num, reason))
}

/// Phase 2 — Core events against the rotating slot list with a C4 swap
/// fallback (§4.4).
async fn schedule_core_event(
    pool: &SqlitePool,
    event: &RetailEvent,
    reference: Date,
    slot_counters: &mut HashMap<Date, usize>,
    core_assignments: &mut HashMap<String, (Date, String)>,
) -> schedcore_shared::Result<Outcome> {
    let date = event.start()?.date();
    let counter = slot_counters.entry(date).or_insert(0);

    if *counter == 0 {
        if let Some(lead_id) = rotation::rotation_for(pool, RotationType::PrimaryLead, date).await? {
            if let Some(lead) = schedcore_roster::employee::get(pool, &lead_id).await? {
                let datetime = OffsetDateTime::new_utc(date, Time::from_hms(9, 45, 0).expect("valid"));
                if constraint::hard_violations(pool, event, &lead, datetime).await?.is_empty() {
                    *counter = 1;
                    if let Some(number) = &event.event_number {
                        core_assignments.insert(number.clone(), (date, lead_id.clone()));
                    }
                    return Ok(Outcome::success(event.project_ref_num, &lead_id, datetime));
                }
            }
        }
    }

    let (slot_hour, slot_minute) = CORE_SLOTS[*counter % CORE_SLOTS.len()];
    let datetime = OffsetDateTime::new_utc(date, Time::from_hms(slot_hour, slot_minute, 0).expect("valid"));
    let candidates = constraint::candidates_for(pool, event, datetime).await?;

    if let Some(employee) = candidates.first() {
        *counter += 1;
        if let Some(number) = &event.event_number {
            core_assignments.insert(number.clone(), (date, employee.id.clone()));
        }
        return Ok(Outcome::success(event.project_ref_num, &employee.id, datetime));
    }

    let mut pool_candidates = schedcore_roster::employee::list_active(pool).await?;
    pool_candidates.sort_by(|a, b| core_role_rank(a).cmp(&core_role_rank(b)).then(a.id.cmp(&b.id)));

    for candidate in &pool_candidates {
        if let Some(swap) = resolver::resolve(pool, event, date, Some(&candidate.id), reference).await? {
            if let Some(number) = &event.event_number {
                core_assignments.insert(
                    number.clone(),
                    (date, swap.displaced_employee_id.clone()),
                );
            }
            return Ok(Outcome::swap(
                event.project_ref_num,
                &swap.displaced_employee_id,
                swap.displaced_schedule_datetime,
                swap.explanation,
            ));
        }
    }

    let dominant = {
        let mut found = Vec::new();
        for employee in schedcore_roster::employee::list_active(pool).await? {
            found = constraint::hard_violations(pool, event, &employee, datetime).await?;
            if !found.is_empty() {
                break;
            }
        }
        found
    };
    let reason = dominant
        .first()
        .map(Violation::description)
        .unwrap_or("no eligible employee")
        .to_string();

    Ok(Outcome::failure(event.project_ref_num, reason))
}

/// Lead Event Specialists before Event Specialists before everyone else,
/// for the Phase-2 candidate order (§4.4 step 2-3).
fn core_role_rank(employee: &Employee) -> u8 {
    use schedcore_shared::roster::JobTitle;
    match employee.job_title() {
        JobTitle::LeadEventSpecialist => 0,
        JobTitle::EventSpecialist => 1,
        _ => 2,
    }
}

#[derive(sqlx::FromRow)]
struct CoreMatch {
    schedule_datetime: i64,
    employee_id: String,
}

/// Phase 3 — Supervisor pairing by 6-digit event-number match (§4.4).
async fn schedule_supervisor_event(
    pool: &SqlitePool,
    event: &RetailEvent,
    core_assignments: &HashMap<String, (Date, String)>,
) -> schedcore_shared::Result<Outcome> {
    let Some(number) = &event.event_number else {
        return Ok(Outcome::failure(event.project_ref_num, "no matching Core event".to_string()));
    };

    let matched = if let Some((date, employee_id)) = core_assignments.get(number) {
        let datetime = OffsetDateTime::new_utc(*date, Time::from_hms(9, 45, 0).expect("valid"));
        Some((datetime.unix_timestamp(), employee_id.clone()))
    } else {
        let statement = Query::select()
            .column((ScheduleTable::Table, ScheduleTable::ScheduleDatetime))
            .column((ScheduleTable::Table, ScheduleTable::EmployeeId))
            .from(ScheduleTable::Table)
            .join(
                sea_query::JoinType::InnerJoin,
                EventTable::Table,
                Expr::col((ScheduleTable::Table, ScheduleTable::EventRefNum))
                    .equals((EventTable::Table, EventTable::ProjectRefNum)),
            )
            .and_where(Expr::col((EventTable::Table, EventTable::EventNumber)).eq(number.as_str()))
            .and_where(Expr::col((EventTable::Table, EventTable::EventType)).eq(EventType::Core.as_ref()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, CoreMatch, _>(&sql, values)
            .fetch_optional(pool)
            .await?
            .map(|row| (row.schedule_datetime, row.employee_id))
    };

    let Some((core_datetime, lead_id)) = matched else {
        return Ok(Outcome::failure(event.project_ref_num, "no matching Core event".to_string()));
    };

    let date = OffsetDateTime::from_unix_timestamp(core_datetime)?.date();
    let noon = OffsetDateTime::new_utc(date, Time::from_hms(12, 0, 0).expect("valid"));

    if let Some(supervisor) = club_supervisor(pool).await? {
        if constraint::hard_violations(pool, event, &supervisor, noon).await?.is_empty() {
            return Ok(Outcome::success(event.project_ref_num, &supervisor.id, noon));
        }
    }

    if let Some(lead) = schedcore_roster::employee::get(pool, &lead_id).await? {
        if constraint::hard_violations(pool, event, &lead, noon).await?.is_empty() {
            return Ok(Outcome::success(event.project_ref_num, &lead_id, noon));
        }
    }

    Ok(Outcome::failure(
        event.project_ref_num,
        "supervisor slot unavailable".to_string(),
    ))
}

impl<E: Executor> super::Command<E> {
    /// Entry point for C5: runs the three-phase engine over the scheduling
    /// window and commits one PendingSchedule per outcome (§4.4).
    pub async fn run(&self, run_type: RunType) -> schedcore_shared::Result<String> {
        let run_id = Ulid::new().to_string();
        let started_at = OffsetDateTime::now_utc().unix_timestamp();

        if !acquire_lock(&self.write_db, &run_id).await? {
            schedcore_shared::conflict!("a scheduler run is already in progress");
        }

        let result = self.run_inner(&run_id, run_type, started_at).await;

        release_lock(&self.write_db).await?;

        match result {
            Ok(()) => Ok(run_id),
            Err(err) => {
                evento::aggregator(&run_id)
                    .original_version(1)
                    .requested_by(SCHEDULER_ACTOR)
                    .event(&Failed {
                        ended_at: OffsetDateTime::now_utc().unix_timestamp(),
                        error_message: err.to_string(),
                    })
                    .commit(&self.executor)
                    .await?;
                Err(err)
            }
        }
    }

    async fn run_inner(
        &self,
        run_id: &str,
        run_type: RunType,
        started_at: i64,
    ) -> schedcore_shared::Result<()> {
        evento::aggregator(run_id)
            .original_version(0)
            .requested_by(SCHEDULER_ACTOR)
            .event(&Started { run_type, started_at })
            .commit(&self.executor)
            .await?;

        let reference = OffsetDateTime::now_utc().date();
        let window = event::list_schedulable_window(&self.read_db, reference, SCHEDULING_WINDOW_DAYS).await?;

        let mut slot_counters: HashMap<Date, usize> = HashMap::new();
        let mut core_assignments: HashMap<String, (Date, String)> = HashMap::new();
        let mut supervisors = Vec::new();

        let mut total_processed = 0u32;
        let mut scheduled = 0u32;
        let mut requiring_swaps = 0u32;
        let mut failed = 0u32;

        for event in &window {
            let event_type = event.event_type();
            let outcome = match event_type {
                EventType::Juicer
                | EventType::DigitalSetup
                | EventType::DigitalRefresh
                | EventType::Freeosk
                | EventType::DigitalTeardown => {
                    Some(schedule_rotation_event(&self.read_db, event).await?)
                }
                EventType::Core => Some(
                    schedule_core_event(
                        &self.read_db,
                        event,
                        reference,
                        &mut slot_counters,
                        &mut core_assignments,
                    )
                    .await?,
                ),
                EventType::Supervisor => {
                    supervisors.push(event.clone());
                    None
                }
                EventType::Digitals | EventType::Other => None,
            };

            let Some(outcome) = outcome else { continue };
            total_processed += 1;
            if outcome.failure_reason.is_some() {
                failed += 1;
            } else if outcome.is_swap {
                requiring_swaps += 1;
            } else {
                scheduled += 1;
            }
            self.propose(run_id, outcome).await?;
        }

        for event in &supervisors {
            let outcome = schedule_supervisor_event(&self.read_db, event, &core_assignments).await?;
            total_processed += 1;
            if outcome.failure_reason.is_some() {
                failed += 1;
            } else {
                scheduled += 1;
            }
            self.propose(run_id, outcome).await?;
        }

        evento::aggregator(run_id)
            .original_version(1)
            .requested_by(SCHEDULER_ACTOR)
            .event(&Succeeded {
                ended_at: OffsetDateTime::now_utc().unix_timestamp(),
                total_processed,
                scheduled,
                requiring_swaps,
                failed,
            })
            .commit(&self.executor)
            .await?;

        Ok(())
    }

    async fn propose(&self, run_id: &str, outcome: Outcome) -> schedcore_shared::Result<()> {
        let pending_id = Ulid::new().to_string();

        evento::aggregator(&pending_id)
            .original_version(0)
            .requested_by(SCHEDULER_ACTOR)
            .event(&schedcore_shared::scheduling::Proposed {
                run_id: run_id.to_owned(),
                event_ref_num: outcome.event_ref_num,
                employee_id: outcome.employee_id,
                schedule_datetime: outcome.schedule_datetime,
                is_swap: outcome.is_swap,
                swap_reason: outcome.swap_reason,
                failure_reason: outcome.failure_reason,
            })
            .commit(&self.executor)
            .await?;

        Ok(())
    }
}
