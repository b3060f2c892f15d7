//! # delimited-core
//!
//! Core data structures for the delimited CSV codec.
//!
//! This crate provides the types shared by the reader and the writer:
//! - [`CsvFormat`] - Delimiters, quoting, comments, escaping and whitespace policy
//! - [`Field`], [`Record`] and [`RecordSet`] - Parsed rows and their header
//! - [`DataType`] and [`Value`] - Semantic type tags and typed values
//! - [`TypeInferencer`] - Type guessing for unquoted field text
//!
//! ## Example
//!
//! ```rust
//! use delimited_core::{CsvFormat, DataType, DefaultTypeInferencer, TypeInferencer};
//! use delimited_core::ConversionPreferences;
//!
//! let mut format = CsvFormat::default();
//! assert!(format.add_column_delimiter(';'));
//! assert!(format.is_column_delimiter(';'));
//! assert_eq!(format.reduce_spaces("  a   b "), "a b");
//!
//! let inferencer = DefaultTypeInferencer;
//! let prefs = ConversionPreferences::SIGNED | ConversionPreferences::INT;
//! assert_eq!(inferencer.guess_type("42", prefs), DataType::Int64);
//! ```

pub mod chars;
pub mod error;
pub mod field;
pub mod format;
pub mod infer;
pub mod record;
pub mod record_set;
pub mod types;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use field::Field;
pub use format::{CsvFormat, DEFAULT_COLUMN_DELIMITER};
pub use infer::{DefaultTypeInferencer, TypeInferencer};
pub use record::Record;
pub use record_set::RecordSet;
pub use types::{ConversionPreferences, DataType};
pub use value::Value;
