mod command;
pub mod event;
pub mod roster;
pub mod scheduling;

pub use command::*;

use evento::Executor;

#[derive(Clone)]
pub struct State<E: Executor> {
    pub executor: E,
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}
