use schedcore_db::table::{
    EmployeeAvailabilityOverride as OverrideTable, EmployeeWeeklyAvailability as WeeklyTable,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use time::Date;

use crate::dateutil::format_date;

/// Whether, and during which window, an employee can be scheduled on a date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Availability {
    Unavailable,
    AllDay,
    Window { start: String, end: String },
}

#[derive(Clone, Debug, FromRow)]
struct WeeklyRow {
    available: bool,
    window_start: Option<String>,
    window_end: Option<String>,
}

#[derive(Clone, Debug, FromRow)]
struct OverrideRow {
    available: bool,
    window_start: Option<String>,
    window_end: Option<String>,
}

fn row_to_availability(available: bool, start: Option<String>, end: Option<String>) -> Availability {
    if !available {
        return Availability::Unavailable;
    }
    match (start, end) {
        (Some(start), Some(end)) => Availability::Window { start, end },
        _ => Availability::AllDay,
    }
}

pub async fn set_weekly(
    pool: &SqlitePool,
    employee_id: &str,
    weekday: u8,
    available: bool,
    window_start: Option<&str>,
    window_end: Option<&str>,
) -> schedcore_shared::Result<()> {
    let statement = Query::delete()
        .from_table(WeeklyTable::Table)
        .and_where(Expr::col(WeeklyTable::EmployeeId).eq(employee_id))
        .and_where(Expr::col(WeeklyTable::Weekday).eq(weekday))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    let statement = Query::insert()
        .into_table(WeeklyTable::Table)
        .columns([
            WeeklyTable::EmployeeId,
            WeeklyTable::Weekday,
            WeeklyTable::Available,
            WeeklyTable::WindowStart,
            WeeklyTable::WindowEnd,
        ])
        .values_panic([
            employee_id.into(),
            weekday.into(),
            available.into(),
            window_start.into(),
            window_end.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn set_override(
    pool: &SqlitePool,
    employee_id: &str,
    date: Date,
    available: bool,
    window_start: Option<&str>,
    window_end: Option<&str>,
) -> schedcore_shared::Result<()> {
    let date = format_date(date);

    let statement = Query::delete()
        .from_table(OverrideTable::Table)
        .and_where(Expr::col(OverrideTable::EmployeeId).eq(employee_id))
        .and_where(Expr::col(OverrideTable::Date).eq(date.clone()))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    let statement = Query::insert()
        .into_table(OverrideTable::Table)
        .columns([
            OverrideTable::EmployeeId,
            OverrideTable::Date,
            OverrideTable::Available,
            OverrideTable::WindowStart,
            OverrideTable::WindowEnd,
        ])
        .values_panic([
            employee_id.into(),
            date.into(),
            available.into(),
            window_start.into(),
            window_end.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Override for the date, else the weekly pattern for its weekday, else unavailable (§4.1).
pub async fn effective_availability(
    pool: &SqlitePool,
    employee_id: &str,
    date: Date,
) -> schedcore_shared::Result<Availability> {
    let statement = Query::select()
        .columns([
            OverrideTable::Available,
            OverrideTable::WindowStart,
            OverrideTable::WindowEnd,
        ])
        .from(OverrideTable::Table)
        .and_where(Expr::col(OverrideTable::EmployeeId).eq(employee_id))
        .and_where(Expr::col(OverrideTable::Date).eq(format_date(date)))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let over = sqlx::query_as_with::<_, OverrideRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    if let Some(over) = over {
        return Ok(row_to_availability(
            over.available,
            over.window_start,
            over.window_end,
        ));
    }

    let weekday = date.weekday().number_days_from_monday();

    let statement = Query::select()
        .columns([
            WeeklyTable::Available,
            WeeklyTable::WindowStart,
            WeeklyTable::WindowEnd,
        ])
        .from(WeeklyTable::Table)
        .and_where(Expr::col(WeeklyTable::EmployeeId).eq(employee_id))
        .and_where(Expr::col(WeeklyTable::Weekday).eq(weekday))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let weekly = sqlx::query_as_with::<_, WeeklyRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    match weekly {
        Some(weekly) => Ok(row_to_availability(
            weekly.available,
            weekly.window_start,
            weekly.window_end,
        )),
        None => Ok(Availability::Unavailable),
    }
}
