use sea_query::{ColumnDef, Table, TableCreateStatement};

use crate::table::SchedulerRunHistory;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(SchedulerRunHistory::Table)
        .col(
            ColumnDef::new(SchedulerRunHistory::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(SchedulerRunHistory::RunType)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(SchedulerRunHistory::State)
                .string()
                .not_null()
                .default("Running"),
        )
        .col(
            ColumnDef::new(SchedulerRunHistory::StartedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(SchedulerRunHistory::EndedAt).timestamp_with_time_zone())
        .col(
            ColumnDef::new(SchedulerRunHistory::TotalProcessed)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(SchedulerRunHistory::Scheduled)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(SchedulerRunHistory::RequiringSwaps)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(SchedulerRunHistory::Failed)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(SchedulerRunHistory::ErrorMessage).string())
        .col(
            ColumnDef::new(SchedulerRunHistory::Version)
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
            .table(SchedulerRunHistory::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
