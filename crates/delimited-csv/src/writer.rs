//! CSV writer

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::Path;

use delimited_core::{CsvFormat, Field, Record, RecordSet, Value};

use crate::error::CsvResult;

/// Where written text goes
enum Sink {
    File(BufWriter<File>),
    Memory(String),
    Device(Box<dyn Write>),
}

impl Sink {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        match self {
            Sink::File(w) => w.write_all(s.as_bytes()),
            Sink::Memory(buf) => {
                buf.push_str(s);
                Ok(())
            }
            Sink::Device(w) => w.write_all(s.as_bytes()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::File(w) => w.flush(),
            Sink::Memory(_) => Ok(()),
            Sink::Device(w) => w.flush(),
        }
    }
}

/// The open sink, if any. Every write is a no-op without one.
#[derive(Default)]
struct Output {
    sink: Option<Sink>,
}

impl Output {
    fn write_str(&mut self, s: &str) -> CsvResult<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        if let Err(e) = sink.write_str(s) {
            log::warn!("CSV write failed, closing output: {e}");
            self.sink = None;
            return Err(e.into());
        }
        Ok(())
    }

    fn write_char(&mut self, c: char) -> CsvResult<()> {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }

    fn write_field(&mut self, format: &CsvFormat, field: &Field) -> CsvResult<()> {
        let reduced = format.reduce_spaces(field.value());
        if reduced.is_empty() {
            return Ok(());
        }
        let wrap = (field.is_qualified() && format.use_text_qualifier())
            || format.needs_qualifier(&reduced);
        if wrap {
            self.write_char(format.text_qualifier())?;
            self.write_str(&format.make_safe(&reduced))?;
            self.write_char(format.text_qualifier())
        } else {
            self.write_str(&reduced)
        }
    }

    fn write_record(
        &mut self,
        format: &CsvFormat,
        record: &Record,
        include_record_separator: bool,
    ) -> CsvResult<()> {
        if record.is_empty() {
            return Ok(());
        }
        for (i, field) in record.iter().enumerate() {
            if i > 0 {
                self.write_char(format.column_delimiter())?;
            }
            self.write_field(format, field)?;
        }
        if include_record_separator {
            self.write_char(format.record_separator())?;
        }
        Ok(())
    }
}

/// CSV writer
///
/// ```rust
/// use delimited_core::{CsvFormat, Field, Record};
/// use delimited_csv::CsvWriter;
///
/// let mut writer = CsvWriter::new(CsvFormat::default());
/// writer.open_to_string();
///
/// let record: Record = vec![Field::new("Smith, John"), Field::unqualified("42")].into();
/// writer.write_record(&record, true)?;
///
/// assert_eq!(writer.take_string().as_deref(), Some("\"Smith, John\",42\n"));
/// # Ok::<(), delimited_csv::CsvError>(())
/// ```
pub struct CsvWriter {
    format: CsvFormat,
    output: Output,
    records: RecordSet,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new(CsvFormat::default())
    }
}

impl CsvWriter {
    /// Create a writer with no sink
    pub fn new(format: CsvFormat) -> Self {
        Self {
            format,
            output: Output::default(),
            records: RecordSet::new(),
        }
    }

    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    pub fn format_mut(&mut self) -> &mut CsvFormat {
        &mut self.format
    }

    pub fn record_set(&self) -> &RecordSet {
        &self.records
    }

    pub fn record_set_mut(&mut self) -> &mut RecordSet {
        &mut self.records
    }

    // === Sinks ===

    /// Write to a new file at `path`, replacing any existing file
    pub fn open_to_path<P: AsRef<Path>>(&mut self, path: P) -> CsvResult<()> {
        self.replace_sink(None);
        let file = File::create(path.as_ref())?;
        log::debug!("Writing CSV to {}", path.as_ref().display());
        self.replace_sink(Some(Sink::File(BufWriter::new(file))));
        Ok(())
    }

    /// Write to an in-memory string, retrieved with [`take_string`](Self::take_string)
    pub fn open_to_string(&mut self) {
        self.replace_sink(Some(Sink::Memory(String::new())));
    }

    /// Write UTF-8 text to any writer
    pub fn open_to_writer<W: Write + 'static>(&mut self, writer: W) {
        self.replace_sink(Some(Sink::Device(Box::new(writer))));
    }

    /// Take the text written so far to an in-memory sink.
    ///
    /// The sink stays open and starts over empty. `None` for other sinks.
    pub fn take_string(&mut self) -> Option<String> {
        match self.output.sink.as_mut() {
            Some(Sink::Memory(buf)) => Some(mem::take(buf)),
            _ => None,
        }
    }

    /// Flush and release the sink. In-memory text not yet taken is dropped.
    pub fn close(&mut self) -> CsvResult<()> {
        if let Some(mut sink) = self.output.sink.take() {
            sink.flush()?;
        }
        Ok(())
    }

    pub fn can_write_to_stream(&self) -> bool {
        self.output.sink.is_some()
    }

    fn replace_sink(&mut self, sink: Option<Sink>) {
        if let Err(e) = self.close() {
            log::warn!("Failed to flush previous CSV output: {e}");
        }
        self.output.sink = sink;
    }

    // === Writing ===

    pub fn write_str(&mut self, s: &str) -> CsvResult<()> {
        self.output.write_str(s)
    }

    pub fn write_column_separator(&mut self) -> CsvResult<()> {
        self.output.write_char(self.format.column_delimiter())
    }

    /// `\n` for the default record delimiter, otherwise the configured one
    pub fn write_record_separator(&mut self) -> CsvResult<()> {
        self.output.write_char(self.format.record_separator())
    }

    /// Write one field, qualified and made safe when needed
    pub fn write_field(&mut self, field: &Field) -> CsvResult<()> {
        self.output.write_field(&self.format, field)
    }

    /// Write the fields of `record` separated by the column delimiter.
    ///
    /// A record with no fields writes nothing, not even the separator.
    pub fn write_record(&mut self, record: &Record, include_record_separator: bool) -> CsvResult<()> {
        self.output
            .write_record(&self.format, record, include_record_separator)
    }

    /// Write the stored header followed by a record separator
    pub fn write_header(&mut self) -> CsvResult<()> {
        self.output
            .write_record(&self.format, self.records.header(), true)
    }

    /// Write up to `count` stored lines starting at `first`; `None` writes
    /// to the end
    pub fn write_lines(&mut self, first: usize, count: Option<usize>) -> CsvResult<()> {
        let count = count.unwrap_or(usize::MAX);
        for line in self.records.lines().iter().skip(first).take(count) {
            self.output.write_record(&self.format, line, true)?;
        }
        Ok(())
    }

    /// Render a typed value as field text.
    ///
    /// Text is reduced and made safe, then qualified when non-empty and the
    /// qualifier is in use (or when its content requires it). Other values
    /// are rendered and made safe.
    pub fn prep_for_writing(&self, value: &Value) -> String {
        match value {
            Value::Null(_) => String::new(),
            Value::String(s) => {
                let reduced = self.format.reduce_spaces(s);
                if reduced.is_empty() {
                    return String::new();
                }
                let safe = self.format.make_safe(&reduced);
                if self.format.use_text_qualifier() || self.format.needs_qualifier(&reduced) {
                    let q = self.format.text_qualifier();
                    format!("{q}{safe}{q}")
                } else {
                    safe.into_owned()
                }
            }
            other => {
                let text = other.to_string();
                let safe = self.format.make_safe(&text);
                if self.format.needs_qualifier(&text) {
                    let q = self.format.text_qualifier();
                    format!("{q}{safe}{q}")
                } else {
                    safe.into_owned()
                }
            }
        }
    }

    /// Write typed values as one record
    pub fn write_values(&mut self, values: &[Value], include_record_separator: bool) -> CsvResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.write_column_separator()?;
            }
            let text = self.prep_for_writing(value);
            self.write_str(&text)?;
        }
        if include_record_separator {
            self.write_record_separator()?;
        }
        Ok(())
    }
}

impl Drop for CsvWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to flush CSV output on drop: {e}");
        }
    }
}
