//! A single column value

use std::fmt;

use crate::error::{Error, Result};
use crate::infer::{parse_bool, parse_date, parse_datetime, parse_double, parse_time, simplify};
use crate::types::DataType;
use crate::value::Value;

/// One column of a record: raw text, a quoted flag, and a type tag.
///
/// Fields read from quoted text are always tagged [`DataType::String`].
/// The reader enforces this; fields built by hand are not checked. Header
/// columns are the usual exception: they are qualified names whose tag is
/// the type of the column below them (see [`RecordSet::add_header`]).
///
/// [`RecordSet::add_header`]: crate::RecordSet::add_header
///
/// `Display` renders the brief form (`"text"` when qualified, `text`
/// otherwise); the alternate form `{:#}` appends the type: `("42", Int64)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
    value: String,
    qualified: bool,
    data_type: DataType,
}

impl Field {
    /// Create a qualified field of unknown type
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            qualified: true,
            data_type: DataType::Unknown,
        }
    }

    /// Create an unqualified field of unknown type
    pub fn unqualified<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            qualified: false,
            data_type: DataType::Unknown,
        }
    }

    /// Create a field with every attribute given
    pub fn with_type<S: Into<String>>(value: S, qualified: bool, data_type: DataType) -> Self {
        Self {
            value: value.into(),
            qualified,
            data_type,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value<S: Into<String>>(&mut self, value: S) {
        self.value = value.into();
    }

    /// Consume the field, returning its text
    pub fn into_value(self) -> String {
        self.value
    }

    pub fn is_qualified(&self) -> bool {
        self.qualified
    }

    pub fn set_qualified(&mut self, qualified: bool) {
        self.qualified = qualified;
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Convert the raw text according to the type tag.
    ///
    /// A value that does not parse as its tag is logged and returned as
    /// [`Value::String`]. Blank text yields [`Value::Null`] of the tag.
    pub fn to_value(&self) -> Value {
        match self.try_to_value() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("{e}; keeping text");
                Value::String(self.value.clone())
            }
        }
    }

    /// Convert the raw text according to the type tag, failing on mismatch.
    pub fn try_to_value(&self) -> Result<Value> {
        if self.data_type == DataType::String {
            return Ok(Value::String(self.value.clone()));
        }

        let text = simplify(&self.value);
        if text.is_empty() {
            return Ok(Value::Null(self.data_type));
        }

        let converted = match self.data_type {
            DataType::String | DataType::Unknown => Some(Value::String(self.value.clone())),
            DataType::Bool => parse_bool(&text).map(Value::Bool),
            DataType::Int64 => text.parse::<i64>().ok().map(Value::Int64),
            DataType::UInt64 => text.parse::<u64>().ok().map(Value::UInt64),
            DataType::Double => parse_double(&text).map(Value::Double),
            DataType::Date => parse_date(&text).map(Value::Date),
            DataType::Time => parse_time(&text).map(Value::Time),
            DataType::DateTime => parse_datetime(&text).map(Value::DateTime),
        };

        converted.ok_or_else(|| Error::Conversion {
            value: self.value.clone(),
            expected: self.data_type.name(),
        })
    }

    /// Render the brief (`"text"`) or verbose (`("text", Int64)`) form
    pub fn describe(&self, brief: bool) -> String {
        if brief {
            format!("{self}")
        } else {
            format!("{self:#}")
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "(\"{}\", {})", self.value, self.data_type)
        } else if self.qualified {
            write!(f, "\"{}\"", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::new(s)
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_constructors() {
        let f = Field::new("x");
        assert!(f.is_qualified());
        assert_eq!(f.data_type(), DataType::Unknown);

        let f = Field::unqualified("x");
        assert!(!f.is_qualified());

        let f = Field::with_type("42", false, DataType::Int64);
        assert_eq!(f.value(), "42");
        assert_eq!(f.data_type(), DataType::Int64);
    }

    #[test]
    fn test_to_value() {
        assert_eq!(
            Field::with_type("42", false, DataType::Int64).to_value(),
            Value::Int64(42)
        );
        assert_eq!(
            Field::with_type(" 2.5 ", false, DataType::Double).to_value(),
            Value::Double(2.5)
        );
        assert_eq!(
            Field::with_type("01/15/2024", false, DataType::Date).to_value(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(
            Field::with_type("", false, DataType::Int64).to_value(),
            Value::Null(DataType::Int64)
        );
        assert_eq!(
            Field::with_type("  ", true, DataType::String).to_value(),
            Value::String("  ".into())
        );
    }

    #[test]
    fn test_to_value_falls_back_to_text() {
        let f = Field::with_type("abc", false, DataType::Int64);
        assert!(matches!(f.try_to_value(), Err(Error::Conversion { .. })));
        assert_eq!(f.to_value(), Value::String("abc".into()));
    }

    #[test]
    fn test_display() {
        let f = Field::with_type("42", false, DataType::Int64);
        assert_eq!(f.to_string(), "42");
        assert_eq!(f.describe(false), "(\"42\", Int64)");

        let f = Field::with_type("Smith, John", true, DataType::String);
        assert_eq!(f.describe(true), "\"Smith, John\"");
    }
}
