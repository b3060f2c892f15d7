//! One row of fields

use std::ops::{Index, IndexMut};

use crate::field::Field;

/// An ordered sequence of [`Field`]s.
///
/// A record built from a pre-read line keeps that line; records assembled
/// incrementally by a parser do not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<Field>,
    original_line: Option<String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record that remembers the line it will be parsed from
    pub fn from_original_line<S: Into<String>>(line: S) -> Self {
        Self {
            fields: Vec::new(),
            original_line: Some(line.into()),
        }
    }

    pub fn contains_original_line(&self) -> bool {
        self.original_line.is_some()
    }

    pub fn original_line(&self) -> Option<&str> {
        self.original_line.as_deref()
    }

    pub fn set_original_line<S: Into<String>>(&mut self, line: S) {
        self.original_line = Some(line.into());
    }

    pub fn clear_original_line(&mut self) {
        self.original_line = None;
    }

    /// Remove the fields and the original line
    pub fn clear(&mut self) {
        self.fields.clear();
        self.original_line = None;
    }

    /// Remove the fields, keeping the original line
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index)
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Field> {
        self.fields.iter_mut()
    }

    /// Find the first field at or after `from` whose text equals `value`,
    /// ignoring case
    pub fn index_of(&self, value: &str, from: usize) -> Option<usize> {
        let needle = value.to_lowercase();
        self.fields
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, f)| f.value().to_lowercase() == needle)
            .map(|(i, _)| i)
    }

    /// The raw text of every field
    pub fn to_string_list(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value().to_string()).collect()
    }

    /// Render the fields comma separated, in brief or verbose field form
    pub fn describe(&self, brief: bool) -> String {
        self.fields
            .iter()
            .map(|f| f.describe(brief))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Index<usize> for Record {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.fields[index]
    }
}

impl IndexMut<usize> for Record {
    fn index_mut(&mut self, index: usize) -> &mut Field {
        &mut self.fields[index]
    }
}

impl FromIterator<Field> for Record {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
            original_line: None,
        }
    }
}

impl From<Vec<Field>> for Record {
    fn from(fields: Vec<Field>) -> Self {
        Self {
            fields,
            original_line: None,
        }
    }
}

impl IntoIterator for Record {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
