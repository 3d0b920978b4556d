//! Database migration utilities (§10.2).

use crate::Config;
use evento::migrator::{Migrate, Plan};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use sqlx_migrator::Info;
use std::path::Path;
use std::str::FromStr;

/// Runs the evento core tables plus every domain migration in `crates/db`
/// against the single configured database.
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let options = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    let mut migrator = schedcore_db::migrator::<sqlx::Sqlite>()?;
    let mut conn = pool.acquire().await?;
    migrator.run(&mut conn, &Plan::apply_all()).await?;

    pool.close().await;
    tracing::info!(url = %config.database.url, "database migrated");

    Ok(())
}

/// Drops the database file (if any) and re-runs migrations from scratch.
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    if let Some(path) = config.database.url.strip_prefix("sqlite://") {
        if Path::new(path).exists() {
            std::fs::remove_file(path)?;
            tracing::info!(path, "dropped database");
        }
    }

    migrate(config).await
}
