use schedcore_db::table::EmployeeTimeOff as TimeOffTable;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};
use time::Date;
use ulid::Ulid;

use crate::dateutil::format_date;

#[derive(Clone, Debug, FromRow)]
pub struct TimeOff {
    pub id: String,
    pub employee_id: String,
    pub start_date: String,
    pub end_date: String,
}

pub async fn add(
    pool: &SqlitePool,
    employee_id: &str,
    start_date: Date,
    end_date: Date,
) -> schedcore_shared::Result<String> {
    let id = Ulid::new().to_string();

    let statement = Query::insert()
        .into_table(TimeOffTable::Table)
        .columns([
            TimeOffTable::Id,
            TimeOffTable::EmployeeId,
            TimeOffTable::StartDate,
            TimeOffTable::EndDate,
        ])
        .values_panic([
            id.clone().into(),
            employee_id.into(),
            format_date(start_date).into(),
            format_date(end_date).into(),
        ])
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(id)
}

pub async fn remove(pool: &SqlitePool, id: &str) -> schedcore_shared::Result<()> {
    let statement = Query::delete()
        .from_table(TimeOffTable::Table)
        .and_where(Expr::col(TimeOffTable::Id).eq(id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn list_for_employee(
    pool: &SqlitePool,
    employee_id: &str,
) -> schedcore_shared::Result<Vec<TimeOff>> {
    let statement = Query::select()
        .columns([
            TimeOffTable::Id,
            TimeOffTable::EmployeeId,
            TimeOffTable::StartDate,
            TimeOffTable::EndDate,
        ])
        .from(TimeOffTable::Table)
        .and_where(Expr::col(TimeOffTable::EmployeeId).eq(employee_id))
        .order_by(TimeOffTable::StartDate, sea_query::Order::Asc)
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, TimeOff, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn is_on_time_off(
    pool: &SqlitePool,
    employee_id: &str,
    date: Date,
) -> schedcore_shared::Result<bool> {
    let date = format_date(date);

    let statement = Query::select()
        .expr(Expr::val(1))
        .from(TimeOffTable::Table)
        .and_where(Expr::col(TimeOffTable::EmployeeId).eq(employee_id))
        .and_where(Expr::col(TimeOffTable::StartDate).lte(date.clone()))
        .and_where(Expr::col(TimeOffTable::EndDate).gte(date))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row: Option<(i32,)> = sqlx::query_as_with(&sql, values).fetch_optional(pool).await?;

    Ok(row.is_some())
}
