mod schedule;
mod server;

pub use schedule::run_schedule;
pub use server::serve;

use crate::Config;

pub async fn migrate(config: Config) -> anyhow::Result<()> {
    crate::migrate::migrate(&config).await
}

pub async fn reset(config: Config) -> anyhow::Result<()> {
    crate::migrate::reset(&config).await
}
