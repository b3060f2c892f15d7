//! Prelude module - common imports for delimited users
//!
//! ```rust
//! use delimited::prelude::*;
//! ```

pub use crate::{
    // Configuration
    CsvFormat,
    CsvReadOptions,

    // I/O types
    CsvError,
    CsvReader,
    CsvResult,
    CsvWriter,

    // Parsed data
    DataType,
    Field,
    Record,
    RecordSet,
    Value,

    // Type guessing
    ConversionPreferences,
    DefaultTypeInferencer,
    TypeInferencer,
};
