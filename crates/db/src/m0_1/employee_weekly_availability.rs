use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::EmployeeWeeklyAvailability;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(EmployeeWeeklyAvailability::Table)
        .col(
            ColumnDef::new(EmployeeWeeklyAvailability::EmployeeId)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(EmployeeWeeklyAvailability::Weekday)
                .tiny_unsigned()
                .not_null(),
        )
        .col(
            ColumnDef::new(EmployeeWeeklyAvailability::Available)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(EmployeeWeeklyAvailability::WindowStart).string())
        .col(ColumnDef::new(EmployeeWeeklyAvailability::WindowEnd).string())
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
            .table(EmployeeWeeklyAvailability::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreatePk;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreatePk {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("pk_employee_weekly_availability")
            .table(EmployeeWeeklyAvailability::Table)
            .col(EmployeeWeeklyAvailability::EmployeeId)
            .col(EmployeeWeeklyAvailability::Weekday)
            .unique()
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
            .name("pk_employee_weekly_availability")
            .table(EmployeeWeeklyAvailability::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
