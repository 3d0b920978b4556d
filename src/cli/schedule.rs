use schedcore_shared::scheduling::RunType;
use schedcore_shared::State;

use crate::Config;

/// One-shot invocation of C5 outside the HTTP surface — e.g. for a system
/// cron that doesn't want to go through `POST /auto-schedule/run` (§10.4).
pub async fn run_schedule(config: Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    let executor: evento::Sqlite = pool.clone().into();
    let state = State {
        executor,
        read_db: pool.clone(),
        write_db: pool,
    };

    let command = schedcore_scheduling::Command::new(state);
    let run_id = command.run(RunType::Manual).await?;
    tracing::info!(run_id, "scheduler run started");

    Ok(())
}
