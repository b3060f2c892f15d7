//! Error types for delimited-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in delimited-core
#[derive(Debug, Error)]
pub enum Error {
    /// Type name not known to [`DataType`](crate::DataType)
    #[error("Unknown data type name: {0}")]
    UnknownType(String),

    /// Raw text could not be converted to the requested type
    #[error("Cannot convert '{value}' to {expected}")]
    Conversion {
        value: String,
        expected: &'static str,
    },
}
