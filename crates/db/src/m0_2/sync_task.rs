use sea_query::{ColumnDef, Expr, Index, Table, TableCreateStatement};

use crate::table::SyncTask;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(SyncTask::Table)
        .col(
            ColumnDef::new(SyncTask::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(SyncTask::TaskType).string().not_null())
        .col(ColumnDef::new(SyncTask::Payload).json_binary().not_null())
        .col(
            ColumnDef::new(SyncTask::Status)
                .string()
                .not_null()
                .default("pending"),
        )
        .col(
            ColumnDef::new(SyncTask::Attempts)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(SyncTask::NotBefore)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(SyncTask::LastError).string())
        .col(
            ColumnDef::new(SyncTask::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(SyncTask::UpdatedAt)
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
            .table(SyncTask::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateStatusIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateStatusIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_sync_task_status_not_before")
            .table(SyncTask::Table)
            .col(SyncTask::Status)
            .col(SyncTask::NotBefore)
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
            .name("idx_sync_task_status_not_before")
            .table(SyncTask::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
