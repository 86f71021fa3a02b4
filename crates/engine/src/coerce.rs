//! Coercion of loosely typed input into storage values.
//!
//! None of these helpers fail: an absent value yields the supplied default.
//! Format checks belong to [`crate::validation`], which runs first.

use api_types::{DateInput, Scalar};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn scalar_text(input: &Scalar) -> String {
    match input {
        Scalar::Text(text) => text.clone(),
        Scalar::Number(number) => number.to_string(),
        Scalar::Bool(value) => value.to_string(),
    }
}

/// Stringify `input`, or return `default` when absent.
pub fn string_or(input: Option<&Scalar>, default: &str) -> String {
    input.map_or_else(|| default.to_string(), scalar_text)
}

/// Stringify `input`, keeping absence as `None`.
pub fn nullable_string(input: Option<&Scalar>) -> Option<String> {
    input.map(scalar_text)
}

pub fn bool_or(input: Option<&Scalar>, default: bool) -> bool {
    match input {
        Some(Scalar::Bool(value)) => *value,
        Some(Scalar::Text(text)) => match text.trim() {
            "true" => true,
            "false" => false,
            _ => default,
        },
        Some(Scalar::Number(number)) => number.as_f64().map_or(default, |n| n != 0.0),
        None => default,
    }
}

pub fn number_or(input: Option<&Scalar>, default: f64) -> f64 {
    match input {
        Some(Scalar::Number(number)) => number.as_f64().unwrap_or(default),
        Some(Scalar::Text(text)) => text.trim().parse().unwrap_or(default),
        Some(Scalar::Bool(value)) => f64::from(u8::from(*value)),
        None => default,
    }
}

/// Parse calendar text: RFC 3339 first, then naive date-times and plain
/// dates, both read as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn date_value(input: &DateInput) -> Option<DateTime<Utc>> {
    match input {
        DateInput::Text(text) => parse_date(text),
        DateInput::Millis(millis) => DateTime::from_timestamp_millis(*millis),
    }
}

/// Resolve `input` to an instant, or `default` when absent or unreadable.
pub fn date_or(input: Option<&DateInput>, default: DateTime<Utc>) -> DateTime<Utc> {
    input.and_then(date_value).unwrap_or(default)
}

pub fn nullable_date(input: Option<&DateInput>) -> Option<DateTime<Utc>> {
    input.and_then(date_value)
}
