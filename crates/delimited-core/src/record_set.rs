//! Header plus data records, shared by readers and writers

use crate::field::Field;
use crate::record::Record;
use crate::types::DataType;

/// A header record and the data records that follow it.
///
/// The header is never mixed into the data lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordSet {
    header: Record,
    lines: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    // === Header ===

    pub fn header(&self) -> &Record {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Record {
        &mut self.header
    }

    pub fn set_header(&mut self, header: Record) {
        self.header = header;
    }

    pub fn clear_header(&mut self) {
        self.header.clear();
    }

    pub fn count_header_columns(&self) -> usize {
        self.header.len()
    }

    /// Append a header column.
    ///
    /// The name is written qualified; `data_type` describes the column's
    /// values, not the name itself.
    pub fn add_header<S: Into<String>>(&mut self, name: S, data_type: DataType) {
        self.header.push(Field::with_type(name, true, data_type));
    }

    /// Replace the header with one qualified column per name
    pub fn set_header_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.header = names
            .iter()
            .map(|n| Field::with_type(n.as_ref(), true, DataType::Unknown))
            .collect();
    }

    /// Assign type tags to the header columns in order, growing the header
    /// with unnamed columns if there are more types than columns
    pub fn set_header_types(&mut self, types: &[DataType]) {
        for (i, &t) in types.iter().enumerate() {
            match self.header.get_mut(i) {
                Some(field) => field.set_data_type(t),
                None => self.header.push(Field::with_type("", true, t)),
            }
        }
    }

    pub fn header_name(&self, index: usize) -> Option<&str> {
        self.header.get(index).map(Field::value)
    }

    pub fn header_type(&self, index: usize) -> Option<DataType> {
        self.header.get(index).map(Field::data_type)
    }

    /// Column index of `name`, compared case-insensitively
    pub fn header_index_by_name(&self, name: &str) -> Option<usize> {
        self.header.index_of(name, 0)
    }

    /// Column indices of each name in `names`, in the same order
    pub fn header_indices_by_name<S: AsRef<str>>(&self, names: &[S]) -> Vec<Option<usize>> {
        names
            .iter()
            .map(|n| self.header_index_by_name(n.as_ref()))
            .collect()
    }

    // === Lines ===

    pub fn lines(&self) -> &[Record] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut Vec<Record> {
        &mut self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Record> {
        self.lines.get(index)
    }

    pub fn push_line(&mut self, record: Record) {
        self.lines.push(record);
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    pub fn count_lines(&self) -> usize {
        self.lines.len()
    }

    /// Number of fields in line `index`, zero if there is no such line
    pub fn count_columns(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, Record::len)
    }

    /// Remove the header and all lines
    pub fn clear(&mut self) {
        self.header.clear();
        self.lines.clear();
    }
}
