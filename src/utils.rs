//! Per-cell coercion from warehouse text into typed values.
//!
//! None of these functions fail: text that cannot be read becomes
//! [`Coerced::Malformed`], which the normalizer stores as a missing cell.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_PREFIX_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Coerced<T> {
    Value(T),
    /// No text at the source.
    Absent,
    /// Text was present but could not be read as the column's type.
    Malformed,
}

impl<T> Coerced<T> {
    pub(crate) fn into_option(self) -> Option<T> {
        match self {
            Coerced::Value(v) => Some(v),
            Coerced::Absent | Coerced::Malformed => None,
        }
    }

    pub(crate) fn is_malformed(&self) -> bool {
        matches!(self, Coerced::Malformed)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn coerce_float(raw: Option<&str>) -> Coerced<f64> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Absent;
    };
    match text.parse::<f64>() {
        Ok(v) if !v.is_nan() => Coerced::Value(v),
        _ => Coerced::Malformed,
    }
}

pub(crate) fn coerce_integer(raw: Option<&str>) -> Coerced<i64> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Absent;
    };
    match text.parse::<i64>() {
        Ok(v) => Coerced::Value(v),
        // Integral values sometimes arrive rendered as floats ("76.0").
        Err(_) => match text.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Coerced::Value(f as i64),
            _ => Coerced::Malformed,
        },
    }
}

/// Reads a timestamp as the wall-clock time written in the text.
///
/// Accepts RFC 3339 (offset is dropped, local time kept), naive
/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`, and a bare date (midnight).
pub(crate) fn coerce_datetime(raw: Option<&str>) -> Coerced<NaiveDateTime> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Absent;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Coerced::Value(dt.naive_local());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Coerced::Value(dt);
        }
    }
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map_or(Coerced::Malformed, Coerced::Value),
        Err(_) => Coerced::Malformed,
    }
}

/// Parses the first ten characters of `raw` as `YYYY-MM-DD`.
pub(crate) fn coerce_date_prefix(raw: Option<&str>) -> Coerced<NaiveDate> {
    let Some(text) = non_blank(raw) else {
        return Coerced::Absent;
    };
    let prefix = text
        .char_indices()
        .nth(DATE_PREFIX_LEN)
        .map_or(text, |(end, _)| &text[..end]);
    match NaiveDate::parse_from_str(prefix, DATE_FORMAT) {
        Ok(date) => Coerced::Value(date),
        Err(_) => Coerced::Malformed,
    }
}

pub(crate) fn coerce_text(raw: Option<&str>) -> Coerced<String> {
    match raw {
        Some(text) if !text.is_empty() => Coerced::Value(text.to_string()),
        _ => Coerced::Absent,
    }
}
