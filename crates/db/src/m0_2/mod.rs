mod pending_schedule;
mod schedule;
mod scheduler_lock;
mod scheduler_run_history;
mod sync_task;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "schedcore",
    "m0_2",
    vec_box![crate::m0_1::Migration],
    vec_box![
        schedule::CreateTable,
        schedule::CreateEventRefIdx,
        schedule::CreateEmployeeDateIdx,
        pending_schedule::CreateTable,
        pending_schedule::CreateRunIdx,
        scheduler_run_history::CreateTable,
        sync_task::CreateTable,
        sync_task::CreateStatusIdx,
        scheduler_lock::CreateTable,
    ]
);
