use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::PendingSchedule;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(PendingSchedule::Table)
        .col(
            ColumnDef::new(PendingSchedule::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(PendingSchedule::RunId).string().not_null())
        .col(
            ColumnDef::new(PendingSchedule::EventRefNum)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(PendingSchedule::EmployeeId).string())
        .col(ColumnDef::new(PendingSchedule::ScheduleDatetime).timestamp_with_time_zone())
        .col(
            ColumnDef::new(PendingSchedule::Status)
                .string()
                .not_null()
                .default("Proposed"),
        )
        .col(
            ColumnDef::new(PendingSchedule::IsSwap)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(PendingSchedule::SwapReason).string())
        .col(ColumnDef::new(PendingSchedule::FailureReason).string())
        .col(
            ColumnDef::new(PendingSchedule::Version)
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
            .table(PendingSchedule::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateRunIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateRunIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_pending_schedule_run_id")
            .table(PendingSchedule::Table)
            .col(PendingSchedule::RunId)
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
            .name("idx_pending_schedule_run_id")
            .table(PendingSchedule::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
