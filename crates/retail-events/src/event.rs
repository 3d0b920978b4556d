use schedcore_db::table::RetailEvent as EventTable;
use schedcore_shared::scheduling::EventType;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use strum::{AsRefStr, Display, EnumString};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Default, Display, EnumString, AsRefStr, PartialEq, Eq)]
pub enum Condition {
    #[default]
    Unstaffed,
    Scheduled,
    Submitted,
    Reissued,
}

#[derive(Clone, Debug, FromRow)]
pub struct RetailEvent {
    pub project_ref_num: i64,
    pub external_id: Option<String>,
    pub location_mvid: Option<String>,
    pub project_name: String,
    pub event_number: Option<String>,
    pub event_type: String,
    pub start_datetime: i64,
    pub due_datetime: i64,
    pub estimated_minutes: i32,
    pub is_scheduled: bool,
    pub condition: String,
}

impl RetailEvent {
    pub fn event_type(&self) -> EventType {
        self.event_type.parse().unwrap_or(EventType::Other)
    }

    pub fn condition(&self) -> Condition {
        self.condition.parse().unwrap_or_default()
    }

    pub fn start(&self) -> schedcore_shared::Result<OffsetDateTime> {
        Ok(OffsetDateTime::from_unix_timestamp(self.start_datetime)?)
    }

    pub fn due(&self) -> schedcore_shared::Result<OffsetDateTime> {
        Ok(OffsetDateTime::from_unix_timestamp(self.due_datetime)?)
    }

    /// Whether this event can be worked on `date` (§3 — start ≤ D ≤ due).
    pub fn is_schedulable_on(&self, date: time::Date) -> schedcore_shared::Result<bool> {
        Ok(self.start()?.date() <= date && date <= self.due()?.date())
    }
}

/// First contiguous run of 6 digits in `project_name` (§3 event number).
pub fn derive_event_number(project_name: &str) -> Option<String> {
    let digits: Vec<char> = project_name.chars().collect();
    let mut run_start = None;

    for (idx, ch) in digits.iter().enumerate() {
        if ch.is_ascii_digit() {
            if run_start.is_none() {
                run_start = Some(idx);
            }
            if let Some(start) = run_start {
                if idx - start + 1 == 6 {
                    return Some(digits[start..=idx].iter().collect());
                }
            }
        } else {
            run_start = None;
        }
    }

    None
}

/// Event type derived from the project name when not explicitly supplied.
pub fn derive_event_type(project_name: &str) -> EventType {
    let name = project_name.to_lowercase();

    if name.contains("supervisor") {
        EventType::Supervisor
    } else if name.contains("juicer") {
        EventType::Juicer
    } else if name.contains("digital setup") {
        EventType::DigitalSetup
    } else if name.contains("digital refresh") {
        EventType::DigitalRefresh
    } else if name.contains("digital teardown") {
        EventType::DigitalTeardown
    } else if name.contains("freeosk") {
        EventType::Freeosk
    } else if name.contains("digitals") {
        EventType::Digitals
    } else if name.contains("core") {
        EventType::Core
    } else {
        EventType::Other
    }
}

pub struct NewEvent {
    pub project_ref_num: i64,
    pub external_id: Option<String>,
    pub location_mvid: Option<String>,
    pub project_name: String,
    pub event_type: Option<EventType>,
    pub start_datetime: i64,
    pub due_datetime: i64,
    pub estimated_minutes: i32,
}

pub async fn create(pool: &SqlitePool, input: NewEvent) -> schedcore_shared::Result<()> {
    let event_number = derive_event_number(&input.project_name);
    let event_type = input
        .event_type
        .unwrap_or_else(|| derive_event_type(&input.project_name));

    let statement = Query::insert()
        .into_table(EventTable::Table)
        .columns([
            EventTable::ProjectRefNum,
            EventTable::ExternalId,
            EventTable::LocationMvid,
            EventTable::ProjectName,
            EventTable::EventNumber,
            EventTable::EventType,
            EventTable::StartDatetime,
            EventTable::DueDatetime,
            EventTable::EstimatedMinutes,
        ])
        .values_panic([
            input.project_ref_num.into(),
            input.external_id.into(),
            input.location_mvid.into(),
            input.project_name.into(),
            event_number.into(),
            event_type.as_ref().into(),
            input.start_datetime.into(),
            input.due_datetime.into(),
            input.estimated_minutes.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn get(
    pool: &SqlitePool,
    project_ref_num: i64,
) -> schedcore_shared::Result<Option<RetailEvent>> {
    let statement = select_all()
        .and_where(Expr::col(EventTable::ProjectRefNum).eq(project_ref_num))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, RetailEvent, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn set_condition(
    pool: &SqlitePool,
    project_ref_num: i64,
    condition: Condition,
    is_scheduled: bool,
) -> schedcore_shared::Result<()> {
    let statement = Query::update()
        .table(EventTable::Table)
        .value(EventTable::Condition, condition.as_ref())
        .value(EventTable::IsScheduled, is_scheduled)
        .and_where(Expr::col(EventTable::ProjectRefNum).eq(project_ref_num))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Upserts one event pulled from upstream, keyed on `external_id` (§6 pull).
/// `project_ref_num` is the upstream id parsed as an integer — external ids
/// are typically the decimal text of the local ref num (§3).
pub async fn upsert_from_sync(
    pool: &SqlitePool,
    external_id: &str,
    location_mvid: Option<&str>,
    project_name: &str,
    start_datetime: i64,
    due_datetime: i64,
) -> schedcore_shared::Result<()> {
    let project_ref_num: i64 = external_id
        .parse()
        .map_err(|_| schedcore_shared::Error::Server(anyhow::anyhow!("non-numeric external id {external_id}")))?;

    let existing = get(pool, project_ref_num).await?;

    match existing {
        Some(_) => {
            let statement = Query::update()
                .table(EventTable::Table)
                .value(EventTable::LocationMvid, location_mvid)
                .value(EventTable::ProjectName, project_name)
                .value(EventTable::StartDatetime, start_datetime)
                .value(EventTable::DueDatetime, due_datetime)
                .and_where(Expr::col(EventTable::ProjectRefNum).eq(project_ref_num))
                .to_owned();
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(pool).await?;
        }
        None => {
            create(
                pool,
                NewEvent {
                    project_ref_num,
                    external_id: Some(external_id.to_owned()),
                    location_mvid: location_mvid.map(str::to_owned),
                    project_name: project_name.to_owned(),
                    event_type: None,
                    start_datetime,
                    due_datetime,
                    estimated_minutes: 0,
                },
            )
            .await?;
        }
    }

    Ok(())
}

fn select_all() -> sea_query::SelectStatement {
    Query::select()
        .columns([
            EventTable::ProjectRefNum,
            EventTable::ExternalId,
            EventTable::LocationMvid,
            EventTable::ProjectName,
            EventTable::EventNumber,
            EventTable::EventType,
            EventTable::StartDatetime,
            EventTable::DueDatetime,
            EventTable::EstimatedMinutes,
            EventTable::IsScheduled,
            EventTable::Condition,
        ])
        .from(EventTable::Table)
        .to_owned()
}

/// Unscheduled events starting within `window_days` of `reference`, sorted
/// by (event-type priority, urgency, project_ref_num) per §4.4.
pub async fn list_schedulable_window(
    pool: &SqlitePool,
    reference: time::Date,
    window_days: i64,
) -> schedcore_shared::Result<Vec<RetailEvent>> {
    let horizon = reference + time::Duration::days(window_days);
    let reference_start = OffsetDateTime::new_utc(reference, time::Time::MIDNIGHT).unix_timestamp();
    let horizon_end = OffsetDateTime::new_utc(horizon, time::Time::from_hms(23, 59, 59)?)
        .unix_timestamp();

    let statement = select_all()
        .and_where(Expr::col(EventTable::IsScheduled).eq(false))
        .and_where(Expr::col(EventTable::StartDatetime).gte(reference_start))
        .and_where(Expr::col(EventTable::StartDatetime).lte(horizon_end))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let mut rows = sqlx::query_as_with::<_, RetailEvent, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    let reference_date = reference;
    rows.sort_by(|a, b| {
        let a_priority = a.event_type().priority();
        let b_priority = b.event_type().priority();
        let a_urgency = urgency(a, reference_date);
        let b_urgency = urgency(b, reference_date);

        a_priority
            .cmp(&b_priority)
            .then(a_urgency.cmp(&b_urgency))
            .then(a.project_ref_num.cmp(&b.project_ref_num))
    });

    Ok(rows)
}

/// Days until due, relative to `reference` (§4.3) — lower is more urgent.
pub fn urgency(event: &RetailEvent, reference: time::Date) -> i64 {
    let due = event
        .due()
        .ok()
        .map(|dt| dt.date())
        .unwrap_or(reference);
    (due - reference).whole_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn event(event_type: &str, start: i64, due: i64) -> RetailEvent {
        RetailEvent {
            project_ref_num: 1,
            external_id: None,
            location_mvid: None,
            project_name: "Core Reset 123456".to_string(),
            event_number: None,
            event_type: event_type.to_string(),
            start_datetime: start,
            due_datetime: due,
            estimated_minutes: 30,
            is_scheduled: false,
            condition: "Unstaffed".to_string(),
        }
    }

    #[test]
    fn derive_event_number_finds_first_six_digit_run() {
        assert_eq!(derive_event_number("Core Reset 123456"), Some("123456".to_string()));
        assert_eq!(derive_event_number("Juicer Demo 12345 then 654321"), Some("654321".to_string()));
        assert_eq!(derive_event_number("no digits here"), None);
        assert_eq!(derive_event_number("short 1234 run"), None);
    }

    #[test]
    fn derive_event_type_matches_keywords_case_insensitively() {
        assert_eq!(derive_event_type("CORE Reset"), EventType::Core);
        assert_eq!(derive_event_type("Juicer Demo"), EventType::Juicer);
        assert_eq!(derive_event_type("Digital Setup Event"), EventType::DigitalSetup);
        assert_eq!(derive_event_type("Digital Refresh Event"), EventType::DigitalRefresh);
        assert_eq!(derive_event_type("Digital Teardown Event"), EventType::DigitalTeardown);
        assert_eq!(derive_event_type("Freeosk Install"), EventType::Freeosk);
        assert_eq!(derive_event_type("Digitals Batch"), EventType::Digitals);
        assert_eq!(derive_event_type("Supervisor Walk"), EventType::Supervisor);
        assert_eq!(derive_event_type("Unrelated Task"), EventType::Other);
    }

    #[test]
    fn urgency_counts_whole_days_to_due() {
        let reference = date!(2026 - 07 - 28);
        let due = time::OffsetDateTime::new_utc(date!(2026 - 08 - 02), time::Time::MIDNIGHT).unix_timestamp();
        let start = time::OffsetDateTime::new_utc(reference, time::Time::MIDNIGHT).unix_timestamp();
        let event = event("Core", start, due);

        assert_eq!(urgency(&event, reference), 5);
    }

    #[test]
    fn is_schedulable_on_respects_start_and_due_bounds() {
        let start = time::OffsetDateTime::new_utc(date!(2026 - 07 - 20), time::Time::MIDNIGHT).unix_timestamp();
        let due = time::OffsetDateTime::new_utc(date!(2026 - 07 - 25), time::Time::MIDNIGHT).unix_timestamp();
        let event = event("Core", start, due);

        assert!(!event.is_schedulable_on(date!(2026 - 07 - 19)).unwrap());
        assert!(event.is_schedulable_on(date!(2026 - 07 - 22)).unwrap());
        assert!(event.is_schedulable_on(date!(2026 - 07 - 25)).unwrap());
        assert!(!event.is_schedulable_on(date!(2026 - 07 - 26)).unwrap());
    }

    #[test]
    fn condition_parses_known_strings_and_defaults_otherwise() {
        let mut event = event("Core", 0, 0);
        event.condition = "Scheduled".to_string();
        assert_eq!(event.condition(), Condition::Scheduled);

        event.condition = "garbage".to_string();
        assert_eq!(event.condition(), Condition::Unstaffed);
    }
}
