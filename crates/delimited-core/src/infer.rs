//! Type inference for unquoted field text
//!
//! The reader only asks an inferencer about fields that were not wrapped in
//! the text qualifier, and again when folding per-field tags into one type per
//! column.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::{ConversionPreferences, DataType};
use crate::value::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// Guesses and generalizes the semantic type of raw field text
pub trait TypeInferencer {
    /// Classify one raw value.
    fn guess_type(&self, raw: &str, preferences: ConversionPreferences) -> DataType;

    /// Return the type able to represent values of both `a` and `b`.
    fn most_general_type(&self, a: DataType, b: DataType) -> DataType;

    /// The null value used for a column of type `data_type`.
    fn null_value_for(&self, data_type: DataType) -> Value {
        Value::Null(data_type)
    }
}

/// The stock inferencer: integers, doubles, dates and times, booleans, text
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTypeInferencer;

impl DefaultTypeInferencer {
    /// Create a new inferencer
    pub fn new() -> Self {
        Self
    }
}

impl TypeInferencer for DefaultTypeInferencer {
    fn guess_type(&self, raw: &str, preferences: ConversionPreferences) -> DataType {
        let simple = simplify(raw);
        if simple.is_empty() {
            return DataType::Unknown;
        }

        let has_minus = simple.contains('-');
        if (has_minus || preferences.signed_only()) && simple.parse::<i64>().is_ok() {
            return DataType::Int64;
        }
        if !has_minus && simple.parse::<u64>().is_ok() {
            return DataType::UInt64;
        }
        if parse_double(&simple).is_some() {
            return DataType::Double;
        }
        if parse_datetime(&simple).is_some() {
            return DataType::DateTime;
        }
        if parse_date(&simple).is_some() {
            return DataType::Date;
        }
        if parse_time(&simple).is_some() {
            return DataType::Time;
        }
        if parse_bool(&simple).is_some() {
            return DataType::Bool;
        }
        DataType::String
    }

    fn most_general_type(&self, a: DataType, b: DataType) -> DataType {
        if a == b {
            return a;
        }
        match (a, b) {
            (DataType::Unknown, other) | (other, DataType::Unknown) => other,
            (x, y) => match (numeric_rank(x), numeric_rank(y)) {
                (Some(rx), Some(ry)) => {
                    if rx >= ry {
                        signed_counterpart(x)
                    } else {
                        signed_counterpart(y)
                    }
                }
                _ => DataType::String,
            },
        }
    }
}

/// Position on the numeric widening ladder. Unsigned and signed integers of
/// the same width share a rank; mixing them widens to the signed type.
fn numeric_rank(t: DataType) -> Option<u8> {
    match t {
        DataType::Int64 | DataType::UInt64 => Some(0),
        DataType::Double => Some(1),
        _ => None,
    }
}

fn signed_counterpart(t: DataType) -> DataType {
    match t {
        DataType::UInt64 => DataType::Int64,
        other => other,
    }
}

/// Trim and collapse internal whitespace runs to single spaces.
pub(crate) fn simplify(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn parse_double(s: &str) -> Option<f64> {
    // Rust accepts "inf" and "NaN"; field text needs at least one digit.
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

pub(crate) fn parse_time(s: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}
