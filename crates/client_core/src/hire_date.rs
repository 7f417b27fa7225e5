//! Conversion between the calendar date edited in forms and the ISO instant sent on the wire.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

const CALENDAR_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hire date '{0}': expected YYYY-MM-DD or an RFC 3339 instant")]
pub struct HireDateError(pub String);

fn parse(input: &str) -> Result<DateTime<Utc>, HireDateError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, CALENDAR_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| HireDateError(input.to_string()))
}

/// `2024-03-05` becomes `2024-03-05T00:00:00.000Z`; instants are re-emitted in UTC.
pub fn to_iso_instant(input: &str) -> Result<String, HireDateError> {
    Ok(parse(input)?.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `2024-03-05T00:00:00.000Z` becomes `2024-03-05`.
pub fn to_calendar_date(input: &str) -> Result<String, HireDateError> {
    Ok(parse(input)?.format(CALENDAR_FORMAT).to_string())
}

#[cfg(test)]
#[path = "tests/hire_date_tests.rs"]
mod tests;
