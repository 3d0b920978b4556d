use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::DailyRotation;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(DailyRotation::Table)
        .col(
            ColumnDef::new(DailyRotation::RotationType)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(DailyRotation::Weekday)
                .tiny_unsigned()
                .not_null(),
        )
        .col(ColumnDef::new(DailyRotation::EmployeeId).string())
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
            .table(DailyRotation::Table)
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
            .name("pk_daily_rotation")
            .table(DailyRotation::Table)
            .col(DailyRotation::RotationType)
            .col(DailyRotation::Weekday)
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
            .name("pk_daily_rotation")
            .table(DailyRotation::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
