//! Calendar date handling for article metadata
//!
//! Article dates are kept as the author wrote them. Parsing happens only when
//! sorting or displaying, and a value that does not parse is shown as
//! [`INVALID_DATE`] instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Display string for a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `January 15, 2024`
    #[default]
    Long,
    /// `Jan 15, 2024`
    Short,
}

/// Parse an ISO-8601 date or date-time into a calendar date.
pub fn parse_date(src: &str) -> Option<NaiveDate> {
    let src = src.trim();
    if let Ok(date) = NaiveDate::parse_from_str(src, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(src) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(src, fmt).ok())
        .map(|datetime| datetime.date())
}

pub fn format_date(src: &str, style: DateStyle) -> String {
    let Some(date) = parse_date(src) else {
        return INVALID_DATE.to_owned();
    };
    match style {
        DateStyle::Long => date.format("%B %-d, %Y").to_string(),
        DateStyle::Short => date.format("%b %-d, %Y").to_string(),
    }
}

/// Today's date in ISO form, used when an article carries no `date`.
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
