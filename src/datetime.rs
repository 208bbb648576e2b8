//! Date normalization for range filters.
//!
//! Range bounds arrive as date strings or epoch timestamps and are
//! normalized to `YYYY-MM-DD HH:MM:SS` text. An end bound gets 23 hours,
//! 59 minutes and 59 seconds added to the normalized instant, so a
//! date-only bound covers every row timestamped within that calendar day.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{BuildError, BuildResult};
use crate::request::Scalar;

/// Canonical text form of a normalized bound.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TEXT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Normalize a bound value to a wall-clock datetime.
///
/// Text parses as a local wall-clock value; numbers are epoch seconds
/// shifted into `offset` first.
pub fn normalize(value: &Scalar, offset: FixedOffset) -> BuildResult<NaiveDateTime> {
    match value {
        Scalar::Text(text) => parse_text(text),
        Scalar::Int(seconds) => from_timestamp(*seconds, offset),
        Scalar::Float(seconds) => from_timestamp(*seconds as i64, offset),
        Scalar::Bool(_) => Err(BuildError::DateParse {
            value: value.to_text(),
        }),
    }
}

/// Format a range start bound.
pub fn range_start(value: &Scalar, offset: FixedOffset) -> BuildResult<String> {
    let instant = normalize(value, offset)?;
    Ok(instant.format(SQL_DATETIME_FORMAT).to_string())
}

/// Format a range end bound, pushed to the end of its calendar day.
pub fn range_end(value: &Scalar, offset: FixedOffset) -> BuildResult<String> {
    let instant = normalize(value, offset)?
        + Duration::hours(23)
        + Duration::minutes(59)
        + Duration::seconds(59);
    Ok(instant.format(SQL_DATETIME_FORMAT).to_string())
}

fn parse_text(text: &str) -> BuildResult<NaiveDateTime> {
    for format in TEXT_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(BuildError::DateParse {
        value: text.to_string(),
    })
}

fn from_timestamp(seconds: i64, offset: FixedOffset) -> BuildResult<NaiveDateTime> {
    let utc = DateTime::from_timestamp(seconds, 0).ok_or(BuildError::DateParse {
        value: seconds.to_string(),
    })?;
    Ok(utc.with_timezone(&offset).naive_local())
}
