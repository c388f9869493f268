//! Calendar-date helpers shared by the evaluator, the wire format and the CLI.
//!
//! Dates never carry a time component. "Today" is the local calendar date,
//! which can be pinned with `FALCON_TODAY=YYYY-MM-DD`.

use crate::error::AppError;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset, Weekday};

const TODAY_ENV_VAR: &str = "FALCON_TODAY";

/// Weekday names as they appear in `repeatDays`, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn today() -> Result<Date, AppError> {
    if let Ok(value) = std::env::var(TODAY_ENV_VAR)
        && !value.trim().is_empty()
    {
        return parse_date(&value)
            .map_err(|_| AppError::invalid_input(format!("{TODAY_ENV_VAR} must be YYYY-MM-DD")));
    }

    Ok(OffsetDateTime::now_utc().to_offset(local_offset()).date())
}

pub fn now_millis() -> u64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    u64::try_from(millis).unwrap_or(0)
}

/// Parses `yyyy-MM-dd`.
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::invalid_input(format!("'{}' is not a YYYY-MM-DD date", raw.trim())))
}

/// Formats as `yyyy-MM-dd`, the storage representation.
pub fn format_date(date: Date) -> String {
    // A date-only description cannot fail to format a `Date`.
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Formats as `dd-MM-yyyy`, the representation used in the incident status line.
pub fn format_date_dmy(date: Date) -> String {
    date.format(format_description!("[day]-[month]-[year]"))
        .unwrap_or_default()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[usize::from(weekday.number_days_from_sunday())]
}

pub fn parse_weekday(raw: &str) -> Result<Weekday, AppError> {
    let lowered = raw.trim().to_ascii_lowercase();
    let weekday = match lowered.as_str() {
        "sun" | "sunday" => Weekday::Sunday,
        "mon" | "monday" => Weekday::Monday,
        "tue" | "tues" | "tuesday" => Weekday::Tuesday,
        "wed" | "wednesday" => Weekday::Wednesday,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thursday,
        "fri" | "friday" => Weekday::Friday,
        "sat" | "saturday" => Weekday::Saturday,
        _ => {
            return Err(AppError::invalid_input(format!(
                "'{}' is not a weekday",
                raw.trim()
            )));
        }
    };
    Ok(weekday)
}

/// Deduplicates and orders weekdays Sunday first.
pub fn normalize_weekdays(days: impl IntoIterator<Item = Weekday>) -> Vec<Weekday> {
    let mut seen = [false; 7];
    for day in days {
        seen[usize::from(day.number_days_from_sunday())] = true;
    }

    let mut normalized = Vec::new();
    let mut day = Weekday::Sunday;
    for present in seen {
        if present {
            normalized.push(day);
        }
        day = day.next();
    }
    normalized
}
