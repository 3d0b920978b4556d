use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::Schedule;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(Schedule::Table)
        .col(
            ColumnDef::new(Schedule::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(Schedule::EventRefNum).big_integer().not_null())
        .col(ColumnDef::new(Schedule::EmployeeId).string().not_null())
        .col(
            ColumnDef::new(Schedule::ScheduleDatetime)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Schedule::SyncStatus)
                .string()
                .not_null()
                .default("Pending"),
        )
        .col(ColumnDef::new(Schedule::ExternalId).string())
        .col(ColumnDef::new(Schedule::LastSynced).timestamp_with_time_zone())
        .col(ColumnDef::new(Schedule::ApiErrorDetails).string())
        .col(
            ColumnDef::new(Schedule::Version)
                .big_integer()
                .not_null()
                .default(0),
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
            .table(Schedule::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateEventRefIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateEventRefIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_schedule_event_ref_num")
            .table(Schedule::Table)
            .col(Schedule::EventRefNum)
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
            .name("idx_schedule_event_ref_num")
            .table(Schedule::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateEmployeeDateIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateEmployeeDateIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_schedule_employee_datetime")
            .table(Schedule::Table)
            .col(Schedule::EmployeeId)
            .col(Schedule::ScheduleDatetime)
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
            .name("idx_schedule_employee_datetime")
            .table(Schedule::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
