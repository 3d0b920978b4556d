use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::RetailEvent;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(RetailEvent::Table)
        .col(
            ColumnDef::new(RetailEvent::ProjectRefNum)
                .big_integer()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(RetailEvent::ExternalId).string())
        .col(ColumnDef::new(RetailEvent::LocationMvid).string())
        .col(ColumnDef::new(RetailEvent::ProjectName).string().not_null())
        .col(ColumnDef::new(RetailEvent::EventNumber).string())
        .col(ColumnDef::new(RetailEvent::EventType).string().not_null())
        .col(
            ColumnDef::new(RetailEvent::StartDatetime)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(RetailEvent::DueDatetime)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(RetailEvent::EstimatedMinutes)
                .integer()
                .not_null()
                .default(60),
        )
        .col(
            ColumnDef::new(RetailEvent::IsScheduled)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(RetailEvent::Condition)
                .string()
                .not_null()
                .default("Unstaffed"),
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
            .table(RetailEvent::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateEventNumberIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateEventNumberIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_retail_event_event_number")
            .table(RetailEvent::Table)
            .col(RetailEvent::EventNumber)
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
            .name("idx_retail_event_event_number")
            .table(RetailEvent::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateSchedulingWindowIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateSchedulingWindowIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_retail_event_scheduling_window")
            .table(RetailEvent::Table)
            .col(RetailEvent::IsScheduled)
            .col(RetailEvent::StartDatetime)
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
            .name("idx_retail_event_scheduling_window")
            .table(RetailEvent::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
