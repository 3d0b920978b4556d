pub mod availability;
mod dateutil;
pub mod employee;
pub mod rotation;
pub mod time_off;

pub use dateutil::{format_date, parse_date, DATE_FORMAT};
