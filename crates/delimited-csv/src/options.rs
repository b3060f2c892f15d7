//! CSV reader options

use delimited_core::ConversionPreferences;

use crate::reader::DEFAULT_CHUNK_SIZE;

/// Options for reading CSV input that are not part of the text format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Bytes pulled from the source per read (default: 10 MiB)
    pub chunk_size: usize,
    /// Integer inference hints (default: signed, int)
    pub preferences: ConversionPreferences,
    /// Fail on a text qualifier in the middle of an unquoted field instead of
    /// discarding the text before it
    pub strict: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            preferences: ConversionPreferences::SIGNED | ConversionPreferences::INT,
            strict: false,
        }
    }
}

impl CsvReadOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_preferences(mut self, preferences: ConversionPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
