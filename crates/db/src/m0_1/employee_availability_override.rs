use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::EmployeeAvailabilityOverride;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(EmployeeAvailabilityOverride::Table)
        .col(
            ColumnDef::new(EmployeeAvailabilityOverride::EmployeeId)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(EmployeeAvailabilityOverride::Date)
                .date()
                .not_null(),
        )
        .col(
            ColumnDef::new(EmployeeAvailabilityOverride::Available)
                .boolean()
                .not_null(),
        )
        .col(ColumnDef::new(EmployeeAvailabilityOverride::WindowStart).string())
        .col(ColumnDef::new(EmployeeAvailabilityOverride::WindowEnd).string())
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
            .table(EmployeeAvailabilityOverride::Table)
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
            .name("pk_employee_availability_override")
            .table(EmployeeAvailabilityOverride::Table)
            .col(EmployeeAvailabilityOverride::EmployeeId)
            .col(EmployeeAvailabilityOverride::Date)
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
            .name("pk_employee_availability_override")
            .table(EmployeeAvailabilityOverride::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
