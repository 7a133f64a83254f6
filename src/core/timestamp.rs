//! Timestamp parsing and storage encoding.
//!
//! Stored timestamps are RFC 3339 in UTC with second precision and a `Z`
//! suffix, so they compare correctly as strings. User input is more lenient.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::PomoError;

/// Encode a timestamp for the database.
#[must_use]
pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Decode a stored timestamp. Returns `None` if it is not valid RFC 3339.
#[must_use]
pub fn from_db(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parse a user-supplied timestamp.
///
/// Supports:
/// - `now`
/// - RFC 3339 (`2024-03-10T09:00:00Z`, `2024-03-10T09:00:00+01:00`)
/// - local date and time (`2024-03-10 09:00`, `2024-03-10T09:00:00`)
/// - local date (`2024-03-10`, midnight)
///
/// # Errors
///
/// Returns `PomoError::InvalidInput` if the input matches none of these.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, PomoError> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("now") {
        return Ok(Utc::now());
    }

    if let Some(ts) = from_db(input) {
        return Ok(ts);
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    naive
        .and_then(|n| Local.from_local_datetime(&n).earliest())
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| {
            PomoError::InvalidInput(format!(
                "Invalid timestamp '{input}' (expected RFC 3339, 'YYYY-MM-DD HH:MM' or 'now')"
            ))
        })
}
