use schedcore_db::table::Schedule as ScheduleTable;
use schedcore_events::RetailEvent;
use schedcore_roster::{availability, employee::Employee, time_off};
use schedcore_shared::roster::JobTitle;
use schedcore_shared::scheduling::EventType;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// The noon Club Supervisor slot is not treated as a conflict against other
/// noon Other-type events on the same day (§4.2, the one documented
/// exception to the overlap rule — see SPEC_FULL §9 for why this is a
/// constant rather than a config flag).
pub const CLUB_SUPERVISOR_NOON_EXEMPT_FROM_CONFLICT: bool = true;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    TimeOff,
    Availability,
    RoleRequirement,
    DailyCoreCap,
    Conflict,
    DueDate,
    ClubSupervisorPreference,
}

impl Violation {
    pub fn is_hard(&self) -> bool {
        !matches!(self, Self::ClubSupervisorPreference)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::TimeOff => "employee is on time off",
            Self::Availability => "outside employee's effective availability",
            Self::RoleRequirement => "employee's job title does not satisfy the role requirement",
            Self::DailyCoreCap => "employee already has a Core assignment that day",
            Self::Conflict => "overlaps an existing assignment",
            Self::DueDate => "past the event's due date",
            Self::ClubSupervisorPreference => "prefer not to use a Club Supervisor on a regular Core event",
        }
    }
}

#[derive(FromRow)]
struct ScheduleRow {
    employee_id: String,
    schedule_datetime: i64,
    event_ref_num: i64,
}

async fn existing_schedules_for_employee(
    pool: &SqlitePool,
    employee_id: &str,
) -> schedcore_shared::Result<Vec<ScheduleRow>> {
    let statement = Query::select()
        .columns([
            ScheduleTable::EmployeeId,
            ScheduleTable::ScheduleDatetime,
            ScheduleTable::EventRefNum,
        ])
        .from(ScheduleTable::Table)
        .and_where(Expr::col(ScheduleTable::EmployeeId).eq(employee_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, ScheduleRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

fn overlaps(a_start: i64, a_minutes: i32, b_start: i64, b_minutes: i32) -> bool {
    let a_end = a_start + a_minutes as i64 * 60;
    let b_end = b_start + b_minutes as i64 * 60;
    a_start < b_end && b_start < a_end
}

/// All hard and soft violations for a candidate (event, employee, datetime) (§4.2).
pub async fn violations(
    pool: &SqlitePool,
    event: &RetailEvent,
    employee: &Employee,
    datetime: OffsetDateTime,
) -> schedcore_shared::Result<Vec<Violation>> {
    let mut found = Vec::new();
    let date = datetime.date();
    let event_type = event.event_type();
    let job_title = employee.job_title();

    if time_off::is_on_time_off(pool, &employee.id, date).await? {
        found.push(Violation::TimeOff);
    }

    match availability::effective_availability(pool, &employee.id, date).await? {
        availability::Availability::Unavailable => found.push(Violation::Availability),
        availability::Availability::AllDay => {}
        availability::Availability::Window { start, end } => {
            let time = format!("{:02}:{:02}", datetime.hour(), datetime.minute());
            if time < start || time > end {
                found.push(Violation::Availability);
            }
        }
    }

    let role_satisfied = if event_type.requires_juicer_barista() {
        job_title.may_work_juicer()
    } else if event_type.requires_lead_or_supervisor() {
        job_title.may_work_lead_role()
    } else {
        true
    };
    if !role_satisfied {
        found.push(Violation::RoleRequirement);
    }

    if date > event.due()?.date() {
        found.push(Violation::DueDate);
    }

    let schedules = existing_schedules_for_employee(pool, &employee.id).await?;

    if matches!(event_type, EventType::Core)
        && schedules.iter().any(|s| {
            OffsetDateTime::from_unix_timestamp(s.schedule_datetime)
                .map(|dt| dt.date() == date)
                .unwrap_or(false)
        })
    {
        found.push(Violation::DailyCoreCap);
    }

    let exempt = CLUB_SUPERVISOR_NOON_EXEMPT_FROM_CONFLICT
        && job_title.is_club_supervisor()
        && matches!(event_type, EventType::Other)
        && datetime.hour() == 12;

    if !exempt
        && schedules.iter().any(|s| {
            overlaps(
                datetime.unix_timestamp(),
                event.estimated_minutes,
                s.schedule_datetime,
                event.estimated_minutes,
            )
        })
    {
        found.push(Violation::Conflict);
    }

    if matches!(event_type, EventType::Core) && job_title.is_club_supervisor() {
        found.push(Violation::ClubSupervisorPreference);
    }

    Ok(found)
}

pub async fn hard_violations(
    pool: &SqlitePool,
    event: &RetailEvent,
    employee: &Employee,
    datetime: OffsetDateTime,
) -> schedcore_shared::Result<Vec<Violation>> {
    Ok(violations(pool, event, employee, datetime)
        .await?
        .into_iter()
        .filter(Violation::is_hard)
        .collect())
}

/// Active employees with no hard violations for (event, datetime), Lead
/// before Event Specialist for Core, then id ascending; the date's Primary
/// Lead is elevated to the front for Core events (§4.2).
pub async fn candidates_for(
    pool: &SqlitePool,
    event: &RetailEvent,
    datetime: OffsetDateTime,
) -> schedcore_shared::Result<Vec<Employee>> {
    let employees = schedcore_roster::employee::list_active(pool).await?;
    let mut feasible = Vec::new();

    for employee in employees {
        if hard_violations(pool, event, &employee, datetime).await?.is_empty() {
            feasible.push(employee);
        }
    }

    feasible.sort_by(|a, b| {
        let a_rank = role_rank(&a.job_title());
        let b_rank = role_rank(&b.job_title());
        a_rank.cmp(&b_rank).then(a.id.cmp(&b.id))
    });

    if matches!(event.event_type(), EventType::Core) {
        let primary_lead =
            schedcore_roster::rotation::rotation_for(pool, schedcore_shared::roster::RotationType::PrimaryLead, datetime.date())
                .await?;
        if let Some(primary_lead) = primary_lead {
            if let Some(pos) = feasible.iter().position(|e| e.id == primary_lead) {
                let employee = feasible.remove(pos);
                feasible.insert(0, employee);
            }
        }
    }

    Ok(feasible)
}

/// Lead before Event Specialist before Juicer Barista before everyone else;
/// Club Supervisor ranks last so a non-Supervisor is preferred on a regular
/// Core event (§4.2 `ClubSupervisorPreference`), consistent with
/// `root::run::core_role_rank`.
fn role_rank(job_title: &JobTitle) -> u8 {
    match job_title {
        JobTitle::LeadEventSpecialist => 0,
        JobTitle::EventSpecialist => 1,
        JobTitle::JuicerBarista => 2,
        JobTitle::ClubSupervisor | JobTitle::Other(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlaps_detects_touching_windows() {
        assert!(overlaps(1_000, 30, 1_500, 30));
        assert!(!overlaps(1_000, 30, 1_000 + 30 * 60, 30));
        assert!(!overlaps(1_000, 30, 10_000, 30));
    }

    #[test]
    fn only_club_supervisor_preference_is_soft() {
        for violation in [
            Violation::TimeOff,
            Violation::Availability,
            Violation::RoleRequirement,
            Violation::DailyCoreCap,
            Violation::Conflict,
            Violation::DueDate,
        ] {
            assert!(violation.is_hard());
        }
        assert!(!Violation::ClubSupervisorPreference.is_hard());
    }

    #[test]
    fn role_rank_orders_leads_above_specialists_above_juicers_above_club_supervisor() {
        assert!(role_rank(&JobTitle::LeadEventSpecialist) < role_rank(&JobTitle::EventSpecialist));
        assert!(role_rank(&JobTitle::EventSpecialist) < role_rank(&JobTitle::JuicerBarista));
        assert!(role_rank(&JobTitle::JuicerBarista) < role_rank(&JobTitle::ClubSupervisor));
        assert_eq!(role_rank(&JobTitle::ClubSupervisor), role_rank(&JobTitle::Other("Stocker".to_string())));
    }
}
