use sea_query::{ColumnDef, Table, TableCreateStatement};

use crate::table::SchedulerLock;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(SchedulerLock::Table)
        .col(
            ColumnDef::new(SchedulerLock::Id)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(SchedulerLock::Locked)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(SchedulerLock::RunId).string())
        .col(ColumnDef::new(SchedulerLock::LockedAt).timestamp_with_time_zone())
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

        // single advisory-lock row, id is always 1 (§5)
        sqlx::query("INSERT INTO scheduler_lock (id, locked) VALUES (1, false)")
            .execute(connection)
            .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Table::drop()
            .table(SchedulerLock::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
