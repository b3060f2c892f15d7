//! # delimited-csv
//!
//! Streaming CSV reader and writer for delimited.
//!
//! [`CsvReader`] pulls one [`Record`](delimited_core::Record) per call from a
//! file, string or arbitrary reader; [`CsvWriter`] pushes records back out.
//! Both are driven by a [`CsvFormat`](delimited_core::CsvFormat).

mod diagnostics;
mod error;
mod options;
mod reader;
mod writer;

pub use diagnostics::ParseWarning;
pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::{CsvReader, ReadState, Records, DEFAULT_CHUNK_SIZE};
pub use writer::CsvWriter;
