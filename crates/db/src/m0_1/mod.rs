mod daily_rotation;
mod employee;
mod employee_availability_override;
mod employee_time_off;
mod employee_weekly_availability;
mod retail_event;
mod rotation_exception;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "schedcore",
    "m0_1",
    vec_box![],
    vec_box![
        employee::CreateTable,
        employee::CreateExternalIdIdx,
        employee_weekly_availability::CreateTable,
        employee_weekly_availability::CreatePk,
        employee_availability_override::CreateTable,
        employee_availability_override::CreatePk,
        employee_time_off::CreateTable,
        employee_time_off::CreateEmployeeIdx,
        retail_event::CreateTable,
        retail_event::CreateEventNumberIdx,
        retail_event::CreateSchedulingWindowIdx,
        daily_rotation::CreateTable,
        daily_rotation::CreatePk,
        rotation_exception::CreateTable,
        rotation_exception::CreateIdx,
    ]
);
