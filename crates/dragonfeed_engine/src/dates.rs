//! Calendar-date normalization for meal bucketing.

use chrono::NaiveDate;

/// Normalize an ISO-8601 string to its local calendar date.
///
/// Accepts:
/// - YYYY-MM-DD (returned as-is)
/// - RFC3339 datetime (local date extracted)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS (date extracted)
pub fn normalize_date_key(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date());
    }
    // Fractional seconds without an offset, as produced by Date.toISOString
    // on some devices with the Z stripped.
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.date());
    }
    None
}

/// Render a calendar date as the canonical YYYY-MM-DD bucket key.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
