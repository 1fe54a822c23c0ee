//! Lenient parsing of the timestamp and number cells found in raw tables.
//!
//! Every parsed instant is normalized to UTC before anything truncates it to a
//! calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a calendar timestamp in any of the layouts the providers emit.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` with or without a UTC offset,
/// `YYYY-MM-DDTHH:MM:SS`, and a bare `YYYY-MM-DD`. Values without an offset
/// are taken to be UTC.
#[must_use]
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses unix-epoch seconds, integral or fractional.
#[must_use]
pub fn parse_epoch_seconds(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }

    let value = parse_f64(text)?;
    let secs = value.floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = ((value - secs) * 1e9).round().min(999_999_999.0) as u32;
    #[allow(clippy::cast_possible_truncation)]
    let secs = secs as i64;
    DateTime::from_timestamp(secs, nanos)
}

/// Epoch seconds first, then calendar layouts.
#[must_use]
pub fn parse_any_timestamp(text: &str) -> Option<DateTime<Utc>> {
    parse_epoch_seconds(text).or_else(|| parse_datetime(text))
}

/// Parses a finite float. `NaN` and infinities are rejected.
#[must_use]
pub fn parse_f64(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an integer, accepting integral floats such as `"12.0"`.
#[must_use]
pub fn parse_i64(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    let v = parse_f64(text)?;
    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    let in_range = v.fract() == 0.0 && v.abs() < i64::MAX as f64;
    #[allow(clippy::cast_possible_truncation)]
    in_range.then_some(v as i64)
}
