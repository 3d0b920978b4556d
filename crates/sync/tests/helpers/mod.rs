use evento::{
    Sqlite,
    migrator::{Migrate, Plan},
};
use schedcore_shared::State;
use sqlx::SqlitePool;
use sqlx_migrator::Info;

pub async fn setup_test_state() -> anyhow::Result<State<Sqlite>> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    let mut migrator = schedcore_db::migrator::<sqlx::Sqlite>()?;
    let mut conn = pool.acquire().await?;
    migrator.run(&mut conn, &Plan::apply_all()).await?;

    Ok(State {
        executor: pool.clone().into(),
        read_db: pool.clone(),
        write_db: pool,
    })
}
