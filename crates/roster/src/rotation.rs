use std::collections::HashMap;

use schedcore_db::table::{
    DailyRotation as DailyTable, Employee as EmployeeTable, RotationException as ExceptionTable,
};
use schedcore_shared::roster::{JobTitle, RotationType};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use time::Date;
use ulid::Ulid;

use crate::dateutil::format_date;

/// Exception for the date, else the weekly rotation for its weekday (§4.1).
pub async fn rotation_for(
    pool: &SqlitePool,
    rotation_type: RotationType,
    date: Date,
) -> schedcore_shared::Result<Option<String>> {
    let statement = Query::select()
        .column(ExceptionTable::EmployeeId)
        .from(ExceptionTable::Table)
        .and_where(Expr::col(ExceptionTable::RotationType).eq(rotation_type.as_ref()))
        .and_where(Expr::col(ExceptionTable::Date).eq(format_date(date)))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let exception: Option<(String,)> = sqlx::query_as_with(&sql, values)
        .fetch_optional(pool)
        .await?;

    if let Some((employee_id,)) = exception {
        return Ok(Some(employee_id));
    }

    let weekday = date.weekday().number_days_from_monday();

    let statement = Query::select()
        .column(DailyTable::EmployeeId)
        .from(DailyTable::Table)
        .and_where(Expr::col(DailyTable::RotationType).eq(rotation_type.as_ref()))
        .and_where(Expr::col(DailyTable::Weekday).eq(weekday))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let weekly: Option<(String,)> = sqlx::query_as_with(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(weekly.map(|(employee_id,)| employee_id))
}

pub async fn set_weekly(
    pool: &SqlitePool,
    rotation_type: RotationType,
    weekday: u8,
    employee_id: &str,
) -> schedcore_shared::Result<()> {
    let statement = Query::delete()
        .from_table(DailyTable::Table)
        .and_where(Expr::col(DailyTable::RotationType).eq(rotation_type.as_ref()))
        .and_where(Expr::col(DailyTable::Weekday).eq(weekday))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    let statement = Query::insert()
        .into_table(DailyTable::Table)
        .columns([DailyTable::RotationType, DailyTable::Weekday, DailyTable::EmployeeId])
        .values_panic([rotation_type.as_ref().into(), weekday.into(), employee_id.into()])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Replaces the full weekly rotation for a type in one transaction; returns
/// the weekdays that were set and any rows rejected for an unknown employee.
pub async fn set_all_weekly(
    pool: &SqlitePool,
    rotation_type: RotationType,
    assignments: HashMap<u8, String>,
) -> schedcore_shared::Result<(Vec<u8>, Vec<(u8, String)>)> {
    let mut tx = pool.begin().await?;
    let mut ok = Vec::new();
    let mut errors = Vec::new();

    for (weekday, employee_id) in assignments {
        let statement = Query::select()
            .expr(Expr::val(1))
            .from(EmployeeTable::Table)
            .and_where(Expr::col(EmployeeTable::Id).eq(employee_id.clone()))
            .and_where(Expr::col(EmployeeTable::IsActive).eq(true))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let exists: Option<(i32,)> = sqlx::query_as_with(&sql, values).fetch_optional(&mut *tx).await?;

        if exists.is_none() {
            errors.push((weekday, employee_id));
            continue;
        }

        let statement = Query::delete()
            .from_table(DailyTable::Table)
            .and_where(Expr::col(DailyTable::RotationType).eq(rotation_type.as_ref()))
            .and_where(Expr::col(DailyTable::Weekday).eq(weekday))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = Query::insert()
            .into_table(DailyTable::Table)
            .columns([DailyTable::RotationType, DailyTable::Weekday, DailyTable::EmployeeId])
            .values_panic([rotation_type.as_ref().into(), weekday.into(), employee_id.clone().into()])
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        ok.push(weekday);
    }

    tx.commit().await?;

    Ok((ok, errors))
}

pub async fn add_exception(
    pool: &SqlitePool,
    rotation_type: RotationType,
    date: Date,
    employee_id: &str,
    reason: Option<&str>,
) -> schedcore_shared::Result<String> {
    let id = Ulid::new().to_string();

    let statement = Query::delete()
        .from_table(ExceptionTable::Table)
        .and_where(Expr::col(ExceptionTable::RotationType).eq(rotation_type.as_ref()))
        .and_where(Expr::col(ExceptionTable::Date).eq(format_date(date)))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    let statement = Query::insert()
        .into_table(ExceptionTable::Table)
        .columns([
            ExceptionTable::Id,
            ExceptionTable::RotationType,
            ExceptionTable::Date,
            ExceptionTable::EmployeeId,
            ExceptionTable::Reason,
        ])
        .values_panic([
            id.clone().into(),
            rotation_type.as_ref().into(),
            format_date(date).into(),
            employee_id.into(),
            reason.into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(id)
}

pub async fn delete_exception(pool: &SqlitePool, id: &str) -> schedcore_shared::Result<()> {
    let statement = Query::delete()
        .from_table(ExceptionTable::Table)
        .and_where(Expr::col(ExceptionTable::Id).eq(id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// All weekly slots and standing exceptions for a rotation type (§6 `GET /rotations`).
#[derive(Clone, Debug, serde::Serialize, FromRow)]
pub struct WeeklySlot {
    pub weekday: u8,
    pub employee_id: String,
}

#[derive(Clone, Debug, serde::Serialize, FromRow)]
pub struct ExceptionRow {
    pub id: String,
    pub date: String,
    pub employee_id: String,
    pub reason: Option<String>,
}

pub async fn list_weekly(pool: &SqlitePool, rotation_type: RotationType) -> schedcore_shared::Result<Vec<WeeklySlot>> {
    let statement = Query::select()
        .columns([DailyTable::Weekday, DailyTable::EmployeeId])
        .from(DailyTable::Table)
        .and_where(Expr::col(DailyTable::RotationType).eq(rotation_type.as_ref()))
        .order_by(DailyTable::Weekday, sea_query::Order::Asc)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, WeeklySlot, _>(&sql, values).fetch_all(pool).await?;

    Ok(rows)
}

pub async fn list_exceptions(pool: &SqlitePool, rotation_type: RotationType) -> schedcore_shared::Result<Vec<ExceptionRow>> {
    let statement = Query::select()
        .columns([ExceptionTable::Id, ExceptionTable::Date, ExceptionTable::EmployeeId, ExceptionTable::Reason])
        .from(ExceptionTable::Table)
        .and_where(Expr::col(ExceptionTable::RotationType).eq(rotation_type.as_ref()))
        .order_by(ExceptionTable::Date, sea_query::Order::Asc)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, ExceptionRow, _>(&sql, values).fetch_all(pool).await?;

    Ok(rows)
}

#[derive(FromRow)]
struct EmployeeRow {
    id: String,
    job_title: String,
}

/// Any active Lead Event Specialist other than the date's Primary Lead,
/// lowest id first (§4.1 — Digital Teardown secondary coverage).
pub async fn secondary_lead_for(
    pool: &SqlitePool,
    date: Date,
) -> schedcore_shared::Result<Option<String>> {
    let primary = rotation_for(pool, RotationType::PrimaryLead, date).await?;

    let statement = Query::select()
        .columns([EmployeeTable::Id, EmployeeTable::JobTitle])
        .from(EmployeeTable::Table)
        .and_where(Expr::col(EmployeeTable::IsActive).eq(true))
        .and_where(Expr::col(EmployeeTable::JobTitle).eq(JobTitle::LeadEventSpecialist.as_ref()))
        .order_by(EmployeeTable::Id, sea_query::Order::Asc)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, EmployeeRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .find(|row| Some(&row.id) != primary.as_ref())
        .map(|row| row.id))
}
