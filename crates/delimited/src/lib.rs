//! # delimited
//!
//! A Rust library for reading and writing delimited text.
//!
//! The format is described by a [`CsvFormat`]: any set of column delimiters,
//! a text qualifier, a record delimiter, comment and escape characters, and a
//! whitespace policy. Unquoted fields are typed by a [`TypeInferencer`].
//!
//! ## Features
//!
//! - Streaming reads from files, strings or any `io::Read`
//! - Quoted fields with embedded delimiters, newlines and doubled qualifiers
//! - Backslash escapes (`\n`, `\t`, `\x41`, `\u263A`, octal and decimal codes)
//! - Comment lines, blank line skipping, whitespace trimming and compaction
//! - Type guessing for numbers, booleans, dates and times
//! - Writing back out in the same or a different format
//!
//! ## Example
//!
//! ```rust
//! use delimited::prelude::*;
//!
//! let mut reader = CsvReader::default();
//! reader.open_from_string("name,age\n\"Doe, Jane\",41\n");
//! reader.read_n_lines(usize::MAX, true).unwrap();
//!
//! assert_eq!(reader.header().to_string_list(), vec!["name", "age"]);
//! assert_eq!(reader.lines()[0][0].value(), "Doe, Jane");
//! assert_eq!(reader.lines()[0][1].data_type(), DataType::Int64);
//!
//! let tsv = CsvFormat::default().with_column_delimiter('\t');
//! let text = delimited::transcode("a,b\n1,2\n", &CsvFormat::default(), &tsv).unwrap();
//! assert_eq!(text, "a\tb\n1\t2\n");
//! ```

pub mod prelude;

// Re-export core types
pub use delimited_core::{
    ConversionPreferences,
    // Configuration
    CsvFormat,
    // Value types
    DataType,
    DefaultTypeInferencer,
    // Error types
    Error,
    // Parsed data
    Field,
    Record,
    RecordSet,
    Result,
    TypeInferencer,
    Value,

    DEFAULT_COLUMN_DELIMITER,
};

// Re-export I/O types
pub use delimited_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvResult, CsvWriter, ParseWarning, ReadState, Records,
    DEFAULT_CHUNK_SIZE,
};

use std::mem;
use std::path::Path;

/// Read a whole file: the first record becomes the header, the rest the lines
pub fn read_path<P: AsRef<Path>>(path: P, format: &CsvFormat) -> CsvResult<RecordSet> {
    let mut reader = CsvReader::new(format.clone());
    reader.open_from_path(path)?;
    drain(&mut reader)
}

/// Read a whole string the way [`read_path`] reads a file
pub fn read_str(text: &str, format: &CsvFormat) -> CsvResult<RecordSet> {
    let mut reader = CsvReader::new(format.clone());
    reader.open_from_string(text);
    drain(&mut reader)
}

fn drain(reader: &mut CsvReader) -> CsvResult<RecordSet> {
    reader.read_n_lines(usize::MAX, true)?;
    let warnings = reader.warnings().len();
    if warnings > 0 {
        log::debug!("{} parse warnings while reading", warnings);
    }
    Ok(mem::take(reader.record_set_mut()))
}

/// Render a header and its lines as text
pub fn write_string(records: &RecordSet, format: &CsvFormat) -> CsvResult<String> {
    let mut writer = CsvWriter::new(format.clone());
    writer.open_to_string();
    *writer.record_set_mut() = records.clone();
    writer.write_header()?;
    writer.write_lines(0, None)?;
    Ok(writer.take_string().unwrap_or_default())
}

/// Write a header and its lines to a file, replacing it
pub fn write_path<P: AsRef<Path>>(
    path: P,
    records: &RecordSet,
    format: &CsvFormat,
) -> CsvResult<()> {
    let mut writer = CsvWriter::new(format.clone());
    writer.open_to_path(path)?;
    *writer.record_set_mut() = records.clone();
    writer.write_header()?;
    writer.write_lines(0, None)?;
    writer.close()
}

/// Re-emit delimited text under a different format.
///
/// Quoted fields stay quoted; everything else is quoted only where the
/// output format requires it.
pub fn transcode(input: &str, from: &CsvFormat, to: &CsvFormat) -> CsvResult<String> {
    let records = read_str(input, from)?;
    write_string(&records, to)
}
