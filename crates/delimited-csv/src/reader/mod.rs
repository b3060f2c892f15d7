//! CSV reader
//!
//! A character level state machine pulling one record per call from a
//! chunked source. All classification goes through the reader's
//! [`CsvFormat`], so the format may be changed between records.

mod buffer;
mod escape;

use std::fs::File;
use std::io::Read;
use std::mem;
use std::path::Path;

use delimited_core::{
    CsvFormat, DataType, DefaultTypeInferencer, Field, Record, RecordSet, TypeInferencer, Value,
};

use crate::diagnostics::ParseWarning;
use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

use buffer::CharBuffer;
use escape::Escape;

pub use buffer::DEFAULT_CHUNK_SIZE;

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadState {
    /// Malformed input in strict mode
    Error,
    /// Before the first character of a record; comment lines are skipped here
    #[default]
    RecordStart,
    /// Before the first character of a field
    ColumnStart,
    /// Inside a field
    ColumnRead,
    /// After a closing qualifier, skipping to the next delimiter
    ColumnEnd,
}

/// Text of the field being assembled
#[derive(Debug, Default)]
struct PendingField {
    text: String,
    /// Started with a qualifier
    qualified: bool,
    /// Between an opening and closing qualifier
    in_quotes: bool,
}

impl PendingField {
    fn reset(&mut self) {
        self.text.clear();
        self.qualified = false;
        self.in_quotes = false;
    }
}

/// Streaming CSV reader
///
/// ```rust
/// use delimited_core::{CsvFormat, DataType};
/// use delimited_csv::CsvReader;
///
/// let mut reader = CsvReader::new(CsvFormat::default());
/// reader.open_from_string("name,age\n\"Smith, John\",42\n");
///
/// assert!(reader.read_header(true)?);
/// assert!(reader.read_next_record(false)?);
///
/// let line = &reader.lines()[0];
/// assert_eq!(line[0].value(), "Smith, John");
/// assert_eq!(line[1].data_type(), DataType::Int64);
/// # Ok::<(), delimited_csv::CsvError>(())
/// ```
pub struct CsvReader {
    format: CsvFormat,
    options: CsvReadOptions,
    inferencer: Box<dyn TypeInferencer>,
    buffer: CharBuffer,
    records: RecordSet,
    column_types: Option<Vec<DataType>>,
    records_read: usize,
    state: ReadState,
    warnings: Vec<ParseWarning>,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new(CsvFormat::default())
    }
}

impl CsvReader {
    /// Create a reader with default options and no source
    pub fn new(format: CsvFormat) -> Self {
        Self::with_options(format, CsvReadOptions::default())
    }

    pub fn with_options(format: CsvFormat, options: CsvReadOptions) -> Self {
        Self {
            buffer: CharBuffer::empty(options.chunk_size),
            format,
            options,
            inferencer: Box::new(DefaultTypeInferencer),
            records: RecordSet::new(),
            column_types: None,
            records_read: 0,
            state: ReadState::RecordStart,
            warnings: Vec::new(),
        }
    }

    /// Replace the type inferencer used for unquoted fields
    pub fn with_inferencer<I: TypeInferencer + 'static>(mut self, inferencer: I) -> Self {
        self.inferencer = Box::new(inferencer);
        self
    }

    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    /// Mutable access to the format; changes apply from the next character read
    pub fn format_mut(&mut self) -> &mut CsvFormat {
        &mut self.format
    }

    pub fn options(&self) -> &CsvReadOptions {
        &self.options
    }

    /// Report a mid-field qualifier as an error instead of recovering
    pub fn set_strict(&mut self, strict: bool) {
        self.options.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.options.strict
    }

    // === Sources ===

    /// Read from the file at `path`
    pub fn open_from_path<P: AsRef<Path>>(&mut self, path: P) -> CsvResult<()> {
        self.release();
        let file = File::open(path.as_ref())?;
        log::debug!("Reading CSV from {}", path.as_ref().display());
        self.buffer = CharBuffer::from_reader(Box::new(file), self.options.chunk_size);
        Ok(())
    }

    /// Read from an in-memory string
    pub fn open_from_string(&mut self, text: &str) {
        self.release();
        self.buffer = CharBuffer::from_text(text, self.options.chunk_size);
    }

    /// Read UTF-8 bytes from any reader
    pub fn open_from_reader<R: Read + 'static>(&mut self, reader: R) {
        self.release();
        self.buffer = CharBuffer::from_reader(Box::new(reader), self.options.chunk_size);
    }

    /// Drop the current source and everything read from it
    pub fn release(&mut self) {
        self.buffer = CharBuffer::empty(self.options.chunk_size);
        self.records.clear();
        self.column_types = None;
        self.records_read = 0;
        self.state = ReadState::RecordStart;
        self.warnings.clear();
    }

    /// True while unread input may remain
    pub fn can_read_from_stream(&self) -> bool {
        self.buffer.can_read()
    }

    // === Cursor ===

    pub fn has_char(&mut self) -> CsvResult<bool> {
        Ok(self.buffer.has_char()?)
    }

    pub fn current_char(&mut self) -> CsvResult<Option<char>> {
        Ok(self.buffer.current()?)
    }

    /// Step past the current character, returning whether another follows
    pub fn move_to_next_char(&mut self) -> CsvResult<bool> {
        self.buffer.advance()?;
        self.has_char()
    }

    pub fn has_last_char(&self) -> bool {
        self.buffer.last().is_some()
    }

    pub fn last_char(&self) -> Option<char> {
        self.buffer.last()
    }

    /// Skip past the next record delimiter. Returns false if the stream ended
    /// first.
    pub fn read_to_next_line(&mut self) -> CsvResult<bool> {
        while let Some(c) = self.buffer.current()? {
            if self.format.is_record_delimiter(c) {
                self.consume_record_delimiter()?;
                return Ok(true);
            }
            self.buffer.advance()?;
        }
        Ok(false)
    }

    // === Records ===

    pub fn record_set(&self) -> &RecordSet {
        &self.records
    }

    pub fn record_set_mut(&mut self) -> &mut RecordSet {
        &mut self.records
    }

    pub fn header(&self) -> &Record {
        self.records.header()
    }

    pub fn lines(&self) -> &[Record] {
        self.records.lines()
    }

    /// Column index of a header name, ignoring case
    pub fn header_index_by_name(&self, name: &str) -> Option<usize> {
        self.records.header_index_by_name(name)
    }

    pub fn header_indices_by_name<S: AsRef<str>>(&self, names: &[S]) -> Vec<Option<usize>> {
        self.records.header_indices_by_name(names)
    }

    /// Records consumed from the current source, header included
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ParseWarning> {
        mem::take(&mut self.warnings)
    }

    /// Read one record without storing it
    pub fn read_record(&mut self) -> CsvResult<Option<Record>> {
        self.parse_record()
    }

    /// Iterate over the remaining records without storing them
    pub fn records(&mut self) -> Records<'_> {
        Records { reader: self }
    }

    /// Read one record and store it as a line.
    ///
    /// With `clear` the stored lines are discarded first. Returns false when
    /// the stream holds no further record.
    pub fn read_next_record(&mut self, clear: bool) -> CsvResult<bool> {
        if clear {
            self.records.clear_lines();
        }
        match self.parse_record()? {
            Some(record) => {
                self.records.push_line(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read one record and store it as the header
    pub fn read_header(&mut self, clear: bool) -> CsvResult<bool> {
        self.records.clear_header();
        if clear {
            self.records.clear_lines();
        }
        match self.parse_record()? {
            Some(record) => {
                self.records.set_header(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read the header if none is stored, then up to `n` lines.
    ///
    /// Stops early without error at end of stream. Returns the number of
    /// lines read.
    pub fn read_n_lines(&mut self, n: usize, clear: bool) -> CsvResult<usize> {
        if self.records.count_header_columns() == 0 && !self.read_header(clear)? {
            return Ok(0);
        }
        let mut count = 0;
        for i in 0..n {
            if !self.has_char()? || !self.read_next_record(clear && i == 0)? {
                break;
            }
            count += 1;
        }
        log::debug!("Number of lines is {}", self.records.count_lines());
        Ok(count)
    }

    /// Parse a single pre-read line. The returned record keeps the line.
    ///
    /// The open source and the record counter are not affected.
    pub fn parse_line(&mut self, line: &str) -> CsvResult<Record> {
        let temp = CharBuffer::from_text(line, self.options.chunk_size);
        let saved_buffer = mem::replace(&mut self.buffer, temp);
        let saved_count = self.records_read;
        let saved_state = self.state;

        let result = self.parse_record();

        self.buffer = saved_buffer;
        self.records_read = saved_count;
        self.state = saved_state;

        let mut record = result?.unwrap_or_default();
        record.set_original_line(line);
        Ok(record)
    }

    /// Render the header and the stored lines, one per line
    pub fn describe(&self, brief: bool) -> String {
        let mut s = self.records.header().describe(brief);
        for line in self.records.lines() {
            s.push('\n');
            s.push_str(&line.describe(brief));
        }
        s
    }

    // === Column types ===

    /// Fold the field types of every stored line into one type per column
    pub fn guess_column_types(&mut self) -> &[DataType] {
        let mut types: Vec<DataType> = Vec::new();
        for line in self.records.lines() {
            for (i, field) in line.iter().enumerate() {
                match types.get_mut(i) {
                    Some(t) => *t = self.inferencer.most_general_type(*t, field.data_type()),
                    None => types.push(field.data_type()),
                }
            }
        }
        log::debug!(
            "Guessed column types: {}",
            types.iter().map(DataType::name).collect::<Vec<_>>().join(", ")
        );
        self.column_types.insert(types).as_slice()
    }

    /// The guessed type of column `index`, guessing all columns if needed
    pub fn guess_column_type(&mut self, index: usize) -> DataType {
        if self.column_types.is_none() {
            self.guess_column_types();
        }
        self.column_type(index)
    }

    /// Override the type of column `index`.
    ///
    /// Guesses first if no types are known; any missing columns before
    /// `index` are [`DataType::Unknown`].
    pub fn set_column_type(&mut self, index: usize, data_type: DataType) {
        if self.column_types.is_none() {
            self.guess_column_types();
        }
        let types = self.column_types.get_or_insert_with(Vec::new);
        if types.len() <= index {
            types.resize(index + 1, DataType::Unknown);
        }
        types[index] = data_type;
    }

    /// Type of column `index`; [`DataType::Unknown`] if not known
    pub fn column_type(&self, index: usize) -> DataType {
        self.column_types
            .as_ref()
            .and_then(|types| types.get(index).copied())
            .unwrap_or(DataType::Unknown)
    }

    pub fn column_types(&self) -> Option<&[DataType]> {
        self.column_types.as_deref()
    }

    /// The null value of column `index`'s type
    pub fn null_value(&self, index: usize) -> Value {
        self.inferencer.null_value_for(self.column_type(index))
    }

    // === State machine ===

    fn parse_record(&mut self) -> CsvResult<Option<Record>> {
        self.state = ReadState::RecordStart;
        let result = self.run_machine();
        let invalid = self.buffer.take_invalid_utf8();
        if invalid > 0 {
            self.warn(ParseWarning::InvalidUtf8 {
                record: self.records_read,
                count: invalid,
            });
        }
        let record = result?;
        if record.is_some() {
            self.records_read += 1;
        }
        Ok(record)
    }

    fn run_machine(&mut self) -> CsvResult<Option<Record>> {
        let mut record = Record::new();
        let mut field = PendingField::default();

        loop {
            log::trace!("state {:?}", self.state);
            match self.state {
                ReadState::Error => {
                    let column = record.len();
                    self.read_to_next_line()?;
                    self.state = ReadState::RecordStart;
                    return Err(CsvError::Parse {
                        record: self.records_read,
                        column,
                        message: format!(
                            "text qualifier after {:?} in an unquoted field",
                            field.text
                        ),
                    });
                }

                ReadState::RecordStart => {
                    if !self.buffer.has_char()? {
                        return Ok(None);
                    }
                    let lead = self.skip_leading_whitespace()?;
                    match self.buffer.current()? {
                        Some(c) if self.format.is_comment_char(c) => {
                            self.read_to_next_line()?;
                        }
                        Some(c)
                            if lead.is_empty()
                                && self.format.skip_empty_lines()
                                && self.format.is_record_delimiter(c) =>
                        {
                            self.consume_record_delimiter()?;
                        }
                        None if self.format.skip_empty_lines() => return Ok(None),
                        _ if lead.is_empty() => self.state = ReadState::ColumnStart,
                        _ => {
                            field.text = lead;
                            self.state = ReadState::ColumnRead;
                        }
                    }
                }

                ReadState::ColumnStart => {
                    field.reset();
                    match self.buffer.current()? {
                        None => {
                            self.end_field(&mut record, &mut field);
                            return Ok(Some(record));
                        }
                        Some(c) if self.format.is_text_qualifier(c) => {
                            self.buffer.advance()?;
                            field.qualified = true;
                            field.in_quotes = true;
                            self.state = ReadState::ColumnRead;
                        }
                        Some(c) if self.format.is_column_delimiter(c) => {
                            self.buffer.advance()?;
                            self.end_field(&mut record, &mut field);
                        }
                        Some(c) if self.format.is_record_delimiter(c) => {
                            self.end_field(&mut record, &mut field);
                            self.consume_record_delimiter()?;
                            return Ok(Some(record));
                        }
                        Some(_) => self.state = ReadState::ColumnRead,
                    }
                }

                ReadState::ColumnRead => {
                    let Some(c) = self.buffer.current()? else {
                        if field.in_quotes {
                            self.warn(ParseWarning::UnterminatedQuote {
                                record: self.records_read,
                                column: record.len(),
                            });
                        }
                        self.end_field(&mut record, &mut field);
                        return Ok(Some(record));
                    };

                    if self.format.is_text_qualifier(c) {
                        if field.in_quotes {
                            self.buffer.advance()?;
                            if self.buffer.current()? == Some(c) {
                                field.text.push(c);
                                self.buffer.advance()?;
                            } else {
                                field.in_quotes = false;
                                self.state = ReadState::ColumnEnd;
                            }
                        } else {
                            let only_whitespace = field.text.trim().is_empty();
                            if !only_whitespace && self.options.strict {
                                self.state = ReadState::Error;
                                continue;
                            }
                            if !only_whitespace {
                                self.warn(ParseWarning::DiscardedBeforeQuote {
                                    record: self.records_read,
                                    column: record.len(),
                                    discarded: field.text.clone(),
                                });
                            }
                            field.text.clear();
                            field.qualified = true;
                            field.in_quotes = true;
                            self.buffer.advance()?;
                        }
                    } else if self.format.is_escape_char(c) {
                        self.buffer.advance()?;
                        match escape::decode(&mut self.buffer)? {
                            Escape::Char(decoded) => field.text.push(decoded),
                            Escape::Invalid(code) => {
                                field.text.push(char::REPLACEMENT_CHARACTER);
                                self.warn(ParseWarning::InvalidEscape {
                                    record: self.records_read,
                                    column: record.len(),
                                    code,
                                });
                            }
                            // Kept literally; the next pass flushes the field
                            Escape::EndOfStream => field.text.push(c),
                        }
                    } else if field.in_quotes {
                        field.text.push(c);
                        self.buffer.advance()?;
                    } else if self.format.is_column_delimiter(c) {
                        self.buffer.advance()?;
                        self.end_field(&mut record, &mut field);
                        self.state = ReadState::ColumnStart;
                    } else if self.format.is_record_delimiter(c) {
                        self.end_field(&mut record, &mut field);
                        self.consume_record_delimiter()?;
                        return Ok(Some(record));
                    } else {
                        field.text.push(c);
                        self.buffer.advance()?;
                    }
                }

                ReadState::ColumnEnd => {
                    let mut trailing = String::new();
                    let at_record_end = loop {
                        match self.buffer.current()? {
                            None => break true,
                            Some(c) if self.format.is_column_delimiter(c) => {
                                self.buffer.advance()?;
                                break false;
                            }
                            Some(c) if self.format.is_record_delimiter(c) => {
                                self.consume_record_delimiter()?;
                                break true;
                            }
                            Some(c) => {
                                trailing.push(c);
                                self.buffer.advance()?;
                            }
                        }
                    };
                    if !trailing.trim().is_empty() {
                        self.warn(ParseWarning::TrailingAfterQuote {
                            record: self.records_read,
                            column: record.len(),
                            trailing,
                        });
                    }
                    self.end_field(&mut record, &mut field);
                    if at_record_end {
                        return Ok(Some(record));
                    }
                    self.state = ReadState::ColumnStart;
                }
            }
        }
    }

    /// Consume spaces and tabs at the start of a line so a comment character
    /// after them is still recognized
    fn skip_leading_whitespace(&mut self) -> CsvResult<String> {
        let mut lead = String::new();
        if !self.format.use_comments() {
            return Ok(lead);
        }
        while let Some(c) = self.buffer.current()? {
            if !self.format.is_skip_whitespace(c) {
                break;
            }
            lead.push(c);
            self.buffer.advance()?;
        }
        Ok(lead)
    }

    /// Step past the record delimiter under the cursor. With the default
    /// delimiter a CR LF or LF CR pair counts as one.
    fn consume_record_delimiter(&mut self) -> CsvResult<()> {
        let Some(c) = self.buffer.current()? else {
            return Ok(());
        };
        self.buffer.advance()?;
        if self.format.record_delimiter_is_default() {
            let pair = match c {
                '\r' => '\n',
                '\n' => '\r',
                _ => return Ok(()),
            };
            if self.buffer.current()? == Some(pair) {
                self.buffer.advance()?;
            }
        }
        Ok(())
    }

    fn end_field(&self, record: &mut Record, field: &mut PendingField) {
        let value = self.format.reduce_spaces(&field.text).into_owned();
        let data_type = if field.qualified {
            DataType::String
        } else {
            self.inferencer
                .guess_type(&value, self.options.preferences)
        };
        record.push(Field::with_type(value, field.qualified, data_type));
        field.reset();
    }

    fn warn(&mut self, warning: ParseWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Iterator over the remaining records of a [`CsvReader`]
pub struct Records<'r> {
    reader: &'r mut CsvReader,
}

impl Iterator for Records<'_> {
    type Item = CsvResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
