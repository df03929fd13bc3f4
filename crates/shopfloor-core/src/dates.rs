//! # Display Dates
//!
//! Dates cross the service boundary as `DD/MM/YYYY` strings, both in DTOs
//! and in date-range queries. Parsing is strict: malformed input is rejected,
//! never coerced.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;

/// chrono format string for `DD/MM/YYYY`.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a `DD/MM/YYYY` date.
///
/// ## Rules
/// - Exactly 10 characters: two-digit day, two-digit month, four-digit year
/// - `/` separators
/// - Must be a real calendar date (`31/02/2024` is rejected)
///
/// ## Example
/// ```rust
/// use shopfloor_core::dates::parse_display_date;
///
/// let date = parse_display_date("startDate", "31/01/2024").unwrap();
/// assert_eq!(date.to_string(), "2024-01-31");
///
/// assert!(parse_display_date("startDate", "2024-01-31").is_err());
/// assert!(parse_display_date("startDate", "1/1/2024").is_err());
/// ```
pub fn parse_display_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::required(field));
    }

    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ValidationError::invalid_format(field, "expected DD/MM/YYYY"));
    }

    NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format(field, "not a valid calendar date"))
}

/// Formats a timestamp's UTC calendar date as `DD/MM/YYYY`.
pub fn format_display_date(at: &DateTime<Utc>) -> String {
    at.format(DISPLAY_DATE_FORMAT).to_string()
}
