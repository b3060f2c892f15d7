//! Semantic type tags attached to fields

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::Error;

/// The semantic type of a field's raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// Free text
    String,
    /// `true` / `false`
    Bool,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// Floating point number
    Double,
    /// Calendar date without time
    Date,
    /// Time of day
    Time,
    /// Date and time of day
    DateTime,
    /// Nothing known yet (empty text, or not inferred)
    #[default]
    Unknown,
}

impl DataType {
    /// All tags, in declaration order
    pub const ALL: [DataType; 9] = [
        DataType::String,
        DataType::Bool,
        DataType::Int64,
        DataType::UInt64,
        DataType::Double,
        DataType::Date,
        DataType::Time,
        DataType::DateTime,
        DataType::Unknown,
    ];

    /// Get the display name for this type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::String => "String",
            DataType::Bool => "Bool",
            DataType::Int64 => "Int64",
            DataType::UInt64 => "UInt64",
            DataType::Double => "Double",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::DateTime => "DateTime",
            DataType::Unknown => "Unknown",
        }
    }

    /// Resolve a type name, falling back to [`DataType::String`].
    ///
    /// Names are matched case-insensitively. An unrecognized name is logged
    /// and treated as text.
    pub fn from_name(name: &str) -> Self {
        match name.parse() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{e}; treating column as String");
                DataType::String
            }
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let found = match lower.as_str() {
            "string" | "text" => DataType::String,
            "bool" | "boolean" => DataType::Bool,
            "int" | "int64" | "long" | "longlong" => DataType::Int64,
            "uint" | "uint64" | "unsigned" | "ulonglong" => DataType::UInt64,
            "double" | "float" | "real" => DataType::Double,
            "date" => DataType::Date,
            "time" => DataType::Time,
            "datetime" | "timestamp" => DataType::DateTime,
            "unknown" | "void" => DataType::Unknown,
            _ => return Err(Error::UnknownType(s.to_string())),
        };
        Ok(found)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hints that steer integer inference.
///
/// Combine with `|`: `ConversionPreferences::SIGNED | ConversionPreferences::INT`.
/// Only 64-bit tags exist, so `INT` and `LONG` are accepted for compatibility
/// and do not change the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConversionPreferences(u8);

impl ConversionPreferences {
    /// No preference
    pub const NONE: Self = Self(0x00);
    /// Prefer signed integers for non-negative numbers
    pub const SIGNED: Self = Self(0x01);
    /// Prefer unsigned integers for non-negative numbers
    pub const UNSIGNED: Self = Self(0x02);
    /// Prefer the narrow integer width
    pub const INT: Self = Self(0x10);
    /// Prefer the wide integer width
    pub const LONG: Self = Self(0x20);

    /// Check whether every bit of `other` is set
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when signed is requested and unsigned is not
    pub fn signed_only(&self) -> bool {
        self.contains(Self::SIGNED) && !self.contains(Self::UNSIGNED)
    }

    /// Raw bit value
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for ConversionPreferences {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConversionPreferences {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
