use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use tracing::log::LevelFilter;

/// WAL mode, a busy timeout to absorb writer contention, `NORMAL` sync since
/// WAL already protects against corruption, and foreign keys (off by default
/// in SQLite).
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;
    sqlx::query("PRAGMA synchronous = NORMAL").execute(pool).await?;
    sqlx::query("PRAGMA cache_size = -20000").execute(pool).await?;
    sqlx::query("PRAGMA foreign_keys = true").execute(pool).await?;
    sqlx::query("PRAGMA temp_store = memory").execute(pool).await?;

    Ok(())
}

/// Multiple connections for concurrent reads (§5).
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .read_only(true)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;
    tracing::info!(max_connections, "created read pool");

    Ok(pool)
}

/// Single connection, so every write serializes through one SQLite
/// connection and `SQLITE_BUSY` never surfaces (§5).
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;
    tracing::info!("created write pool with 1 connection");

    Ok(pool)
}

/// A single pool for CLI/migration contexts that don't need read/write
/// separation.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;
    tracing::info!(max_connections, "created pool");

    Ok(pool)
}
