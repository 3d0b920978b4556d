use sea_query::{ColumnDef, Expr, Index, Table, TableCreateStatement};

use crate::table::Employee;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(Employee::Table)
        .col(
            ColumnDef::new(Employee::Id)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Employee::ExternalId).string())
        .col(ColumnDef::new(Employee::Name).string().not_null())
        .col(ColumnDef::new(Employee::JobTitle).string().not_null())
        .col(
            ColumnDef::new(Employee::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Employee::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Table::drop()
            .table(Employee::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateExternalIdIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateExternalIdIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_employee_external_id")
            .table(Employee::Table)
            .col(Employee::ExternalId)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::drop()
            .name("idx_employee_external_id")
            .table(Employee::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
