//! Non-fatal parse diagnostics
//!
//! Each lossy recovery the reader makes is recorded here so callers can
//! decide whether the input was acceptable. In strict mode a qualifier in the
//! middle of an unquoted field is an error instead of a recovery.

use thiserror::Error;

/// A lossy recovery performed while parsing.
///
/// `record` is the zero based index of the record being parsed (the number of
/// records read before it) and `column` the index of the affected field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// A qualifier appeared mid-field; the text before it was dropped
    #[error("record {record}, column {column}: discarded {discarded:?} before text qualifier")]
    DiscardedBeforeQuote {
        record: usize,
        column: usize,
        discarded: String,
    },

    /// Text between a closing qualifier and the next delimiter was dropped
    #[error("record {record}, column {column}: discarded {trailing:?} after closing text qualifier")]
    TrailingAfterQuote {
        record: usize,
        column: usize,
        trailing: String,
    },

    /// The stream ended inside a quoted field
    #[error("record {record}, column {column}: unterminated quoted field at end of input")]
    UnterminatedQuote { record: usize, column: usize },

    /// Input bytes were not valid UTF-8 and were replaced with U+FFFD
    #[error("record {record}: {count} invalid UTF-8 sequence(s) replaced")]
    InvalidUtf8 { record: usize, count: usize },

    /// A numeric escape named no valid character; U+FFFD was used
    #[error("record {record}, column {column}: escape sequence value {code:#x} is not a valid character")]
    InvalidEscape {
        record: usize,
        column: usize,
        code: u32,
    },
}

impl ParseWarning {
    /// Index of the record the warning belongs to
    pub fn record(&self) -> usize {
        match self {
            ParseWarning::DiscardedBeforeQuote { record, .. }
            | ParseWarning::TrailingAfterQuote { record, .. }
            | ParseWarning::UnterminatedQuote { record, .. }
            | ParseWarning::InvalidUtf8 { record, .. }
            | ParseWarning::InvalidEscape { record, .. } => *record,
        }
    }
}
