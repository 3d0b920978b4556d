use std::sync::Arc;

use axum::Router;
use evento::migrator::{Migrate, Plan};
use schedcore::routes;
use schedcore_sync::{ClientConfig, ReqwestUpstreamClient, RetryPolicy, Worker};
use sqlx::SqlitePool;
use sqlx_migrator::Info;

/// A fully-wired router against an in-memory database, mirroring
/// `cli::server::serve` minus the network listener and background tasks.
pub struct TestApp {
    pub app: Router,
    executor: evento::sql::RwSqlite,
    pool: SqlitePool,
}

impl TestApp {
    /// Runs the scheduling read-model projection over whatever events a
    /// command just committed, mirroring the `unretry_execute` idiom used
    /// against a long-lived `.start()` subscription in production.
    pub async fn sync(&self) -> anyhow::Result<()> {
        schedcore_scheduling::subscription()
            .data(self.pool.clone())
            .unretry_execute(&self.executor)
            .await?;
        Ok(())
    }

    /// The raw pool, for seeding fixtures and inspecting read-model state
    /// directly — there is no admin HTTP surface for roster/event CRUD.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A `schedcore_shared::State` for constructing a `Command` directly,
    /// the same way `src/routes/*` build one per request.
    pub fn state(&self) -> schedcore_shared::State<evento::sql::RwSqlite> {
        schedcore_shared::State {
            executor: self.executor.clone(),
            read_db: self.pool.clone(),
            write_db: self.pool.clone(),
        }
    }
}

/// The next Monday strictly after today, so seeded rotation/Core scenarios
/// land on a predictable weekday without depending on the wall-clock date.
pub fn next_monday() -> time::Date {
    let today = time::OffsetDateTime::now_utc().date();
    let from_monday = today.weekday().number_days_from_monday() as i64;
    let days_ahead = if from_monday == 0 { 7 } else { 7 - from_monday };
    today + time::Duration::days(days_ahead)
}

pub fn at(date: time::Date, hour: u8, minute: u8) -> i64 {
    time::OffsetDateTime::new_utc(date, time::Time::from_hms(hour, minute, 0).expect("valid time"))
        .unix_timestamp()
}

/// Marks an employee available all day, every day — the scheduler treats a
/// missing weekly row as unavailable (§4.1), so fixtures need this to reach
/// any outcome other than an availability violation.
pub async fn available_all_week(pool: &SqlitePool, employee_id: &str) -> anyhow::Result<()> {
    for weekday in 0..7u8 {
        schedcore_roster::availability::set_weekly(pool, employee_id, weekday, true, None, None).await?;
    }
    Ok(())
}

pub async fn test_app() -> anyhow::Result<TestApp> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    let mut migrator = schedcore_db::migrator::<sqlx::Sqlite>()?;
    let mut conn = pool.acquire().await?;
    migrator.run(&mut conn, &Plan::apply_all()).await?;

    let executor: evento::sql::RwSqlite =
        (evento::Sqlite::from(pool.clone()), evento::Sqlite::from(pool.clone())).into();

    let state = schedcore_shared::State {
        executor: executor.clone(),
        read_db: pool.clone(),
        write_db: pool.clone(),
    };

    let client = Arc::new(ReqwestUpstreamClient::new(ClientConfig {
        base_url: "https://upstream.invalid".to_string(),
        username: "test".to_string(),
        password: "test".to_string(),
        request_timeout: std::time::Duration::from_secs(5),
        session_refresh_interval: std::time::Duration::from_secs(3600),
    })?);

    let worker = Arc::new(Worker {
        executor: executor.clone(),
        read_db: pool.clone(),
        write_db: pool.clone(),
        client: client.clone(),
        retry: RetryPolicy::default(),
        local_offset: time::UtcOffset::UTC,
    });

    let app = routes::router(state, client, worker);

    Ok(TestApp { app, executor, pool })
}
