use time::{Date, format_description::FormatItem, macros::format_description};

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).expect("fixed date format")
}

pub fn parse_date(value: &str) -> schedcore_shared::Result<Date> {
    Ok(Date::parse(value, DATE_FORMAT)?)
}
