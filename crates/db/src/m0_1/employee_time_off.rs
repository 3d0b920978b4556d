use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::EmployeeTimeOff;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(EmployeeTimeOff::Table)
        .col(
            ColumnDef::new(EmployeeTimeOff::Id)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(EmployeeTimeOff::EmployeeId)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(EmployeeTimeOff::StartDate)
                .date()
                .not_null(),
        )
        .col(ColumnDef::new(EmployeeTimeOff::EndDate).date().not_null())
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
            .table(EmployeeTimeOff::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateEmployeeIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateEmployeeIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_employee_time_off_employee_id")
            .table(EmployeeTimeOff::Table)
            .col(EmployeeTimeOff::EmployeeId)
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
            .name("idx_employee_time_off_employee_id")
            .table(EmployeeTimeOff::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
