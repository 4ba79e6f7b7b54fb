//! Date text formats used by the upstream sources.
//!
//! CafeF speaks `dd/mm/yyyy` both in query parameters and in its payloads.
//! Smoney embeds ISO dates, sometimes with a time component attached.

use chrono::{NaiveDate, NaiveDateTime};

/// Query-string format for date bounds (`05/12/2025`).
pub const QUERY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Renders a date bound the way the remote endpoints expect it.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

/// Parses a `dd/mm/yyyy` date.
pub fn parse_query_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text.trim(), QUERY_DATE_FORMAT)
}

/// Parses a payload date in any of the shapes the sources emit.
///
/// Accepted: `dd/mm/yyyy`, `yyyy-mm-dd`, `yyyy-mm-ddTHH:MM:SS[.fff][offset]`
/// and `yyyy-mm-dd HH:MM:SS`. The time part is dropped.
pub fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, QUERY_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}
