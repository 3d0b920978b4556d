use schedcore_db::table::Employee as EmployeeTable;
use schedcore_shared::roster::JobTitle;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{FromRow, SqlitePool};

#[derive(Clone, Debug, FromRow)]
pub struct Employee {
    pub id: String,
    pub external_id: Option<String>,
    pub name: String,
    pub job_title: String,
    pub is_active: bool,
}

impl Employee {
    pub fn job_title(&self) -> JobTitle {
        self.job_title
            .parse()
            .unwrap_or_else(|_| JobTitle::Other(self.job_title.to_owned()))
    }
}

pub struct NewEmployee {
    pub id: String,
    pub external_id: Option<String>,
    pub name: String,
    pub job_title: String,
}

pub async fn create(pool: &SqlitePool, input: NewEmployee) -> schedcore_shared::Result<()> {
    let statement = Query::insert()
        .into_table(EmployeeTable::Table)
        .columns([
            EmployeeTable::Id,
            EmployeeTable::ExternalId,
            EmployeeTable::Name,
            EmployeeTable::JobTitle,
            EmployeeTable::IsActive,
        ])
        .values_panic([
            input.id.into(),
            input.external_id.into(),
            input.name.into(),
            input.job_title.into(),
            true.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn set_active(
    pool: &SqlitePool,
    id: &str,
    is_active: bool,
) -> schedcore_shared::Result<()> {
    let statement = Query::update()
        .table(EmployeeTable::Table)
        .value(EmployeeTable::IsActive, is_active)
        .and_where(Expr::col(EmployeeTable::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn set_external_id(
    pool: &SqlitePool,
    id: &str,
    external_id: Option<&str>,
) -> schedcore_shared::Result<()> {
    let statement = Query::update()
        .table(EmployeeTable::Table)
        .value(EmployeeTable::ExternalId, external_id)
        .and_where(Expr::col(EmployeeTable::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, id: &str) -> schedcore_shared::Result<Option<Employee>> {
    let statement = Query::select()
        .columns([
            EmployeeTable::Id,
            EmployeeTable::ExternalId,
            EmployeeTable::Name,
            EmployeeTable::JobTitle,
            EmployeeTable::IsActive,
        ])
        .from(EmployeeTable::Table)
        .and_where(Expr::col(EmployeeTable::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, Employee, _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn list_active(pool: &SqlitePool) -> schedcore_shared::Result<Vec<Employee>> {
    let statement = Query::select()
        .columns([
            EmployeeTable::Id,
            EmployeeTable::ExternalId,
            EmployeeTable::Name,
            EmployeeTable::JobTitle,
            EmployeeTable::IsActive,
        ])
        .from(EmployeeTable::Table)
        .and_where(Expr::col(EmployeeTable::IsActive).eq(true))
        .order_by(EmployeeTable::Id, sea_query::Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, Employee, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn upsert_from_sync(
    pool: &SqlitePool,
    external_id: &str,
    name: &str,
    job_title: &str,
) -> schedcore_shared::Result<()> {
    let statement = Query::select()
        .column(EmployeeTable::Id)
        .from(EmployeeTable::Table)
        .and_where(Expr::col(EmployeeTable::ExternalId).eq(external_id))
        .to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let existing: Option<(String,)> = sqlx::query_as_with(&sql, values)
        .fetch_optional(pool)
        .await?;

    match existing {
        Some((id,)) => {
            let statement = Query::update()
                .table(EmployeeTable::Table)
                .value(EmployeeTable::Name, name)
                .value(EmployeeTable::JobTitle, job_title)
                .and_where(Expr::col(EmployeeTable::Id).eq(id))
                .to_owned();
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(pool).await?;
        }
        None => {
            create(
                pool,
                NewEmployee {
                    id: external_id.to_owned(),
                    external_id: Some(external_id.to_owned()),
                    name: name.to_owned(),
                    job_title: job_title.to_owned(),
                },
            )
            .await?;
        }
    }

    Ok(())
}
