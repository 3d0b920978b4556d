use sea_query::{ColumnDef, Index, Table, TableCreateStatement};

use crate::table::RotationException;

pub struct CreateTable;

fn create_statement() -> TableCreateStatement {
    Table::create()
        .table(RotationException::Table)
        .col(
            ColumnDef::new(RotationException::Id)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(RotationException::RotationType)
                .string()
                .not_null(),
        )
        .col(ColumnDef::new(RotationException::Date).date().not_null())
        .col(
            ColumnDef::new(RotationException::EmployeeId)
                .string()
                .not_null(),
        )
        .col(ColumnDef::new(RotationException::Reason).string())
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
            .table(RotationException::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}

pub struct CreateIdx;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = Index::create()
            .name("idx_rotation_exception_type_date")
            .table(RotationException::Table)
            .col(RotationException::RotationType)
            .col(RotationException::Date)
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
            .name("idx_rotation_exception_type_date")
            .table(RotationException::Table)
            .to_owned()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;
        Ok(())
    }
}
