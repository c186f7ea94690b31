//! Due instants: a calendar date plus a wall-clock time, read as UTC.

use time::{
    format_description::FormatItem, macros::format_description, Date, Duration, OffsetDateTime,
    PrimitiveDateTime, Time,
};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMATS: [&[FormatItem<'static>]; 3] = [
    format_description!("[hour]:[minute]:[second]"),
    format_description!("[hour]:[minute]:[second].[subsecond]"),
    format_description!("[hour]:[minute]"),
];

/// `YYYY-MM-DD`, rejecting impossible days such as `2024-02-30`.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// `HH:MM:SS`, `HH:MM:SS.fff` or `HH:MM`. Fractions are cut to microseconds,
/// the precision of `timestamptz`.
pub fn parse_time(raw: &str) -> Option<Time> {
    let raw = raw.trim();
    let parsed = TIME_FORMATS
        .iter()
        .find_map(|format| Time::parse(raw, format).ok())?;
    Time::from_hms_micro(
        parsed.hour(),
        parsed.minute(),
        parsed.second(),
        parsed.microsecond(),
    )
    .ok()
}

pub fn combine(date: Date, time: Time) -> OffsetDateTime {
    PrimitiveDateTime::new(date, time).assume_utc()
}

pub fn due_instant(date: &str, time: &str) -> Option<OffsetDateTime> {
    Some(combine(parse_date(date)?, parse_time(time)?))
}

/// Half-open UTC window `[00:00, next day 00:00)` covering `date`.
pub fn day_bounds(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.midnight().assume_utc();
    (start, start + Duration::days(1))
}
