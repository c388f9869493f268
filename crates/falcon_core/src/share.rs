use crate::calendar::format_date_dmy;
use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;
use time::Date;

static CLASS_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-A-Za-z0-9_]{25,}").expect("class key pattern is valid"));

/// `"<dd-MM-yyyy> ~ No major incident found!"` for the given day.
pub fn incident_text(today: Date) -> String {
    format!("{} ~ No major incident found!", format_date_dmy(today))
}

/// First run of 25 or more URL-safe characters in a pasted share link.
pub fn extract_class_key(link: &str) -> Result<String, AppError> {
    CLASS_KEY_RE
        .find(link)
        .map(|found| found.as_str().to_string())
        .ok_or_else(|| AppError::invalid_input("invalid drive link"))
}
