//! Format configuration shared by the reader and the writer
//!
//! [`CsvFormat`] holds every knob that controls how delimited text is split
//! into records and fields, and how fields are quoted on the way out. All
//! character classification done by the reader goes through its predicates.

use std::borrow::Cow;

/// Character used when no column delimiter is configured, and preferred for
/// display whenever it is configured.
pub const DEFAULT_COLUMN_DELIMITER: char = ',';

const CR: char = '\r';
const LF: char = '\n';

/// Delimiters, quoting, comments, escaping and whitespace policy.
///
/// Setters return `true` when the value actually changed and `false` when the
/// new value equals the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CsvFormat {
    text_qualifier: char,
    /// Insertion ordered, no duplicates
    column_delimiters: Vec<char>,
    record_delimiter: char,
    /// Accept either CR or LF as the record delimiter
    record_delimiter_is_default: bool,
    comment_char: char,
    escape_char: char,
    use_comments: bool,
    trim_spaces: bool,
    compact_spaces: bool,
    skip_empty_lines: bool,
    /// Stored but not acted upon by the reader
    merge_delimiters: bool,
    /// Write side only; the qualifier is always recognized when reading
    use_text_qualifier: bool,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            text_qualifier: '"',
            column_delimiters: vec![DEFAULT_COLUMN_DELIMITER],
            record_delimiter: LF,
            record_delimiter_is_default: true,
            comment_char: '#',
            escape_char: '\\',
            use_comments: true,
            trim_spaces: true,
            compact_spaces: true,
            skip_empty_lines: true,
            merge_delimiters: false,
            use_text_qualifier: true,
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl CsvFormat {
    /// Create a format with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    // === Getters ===

    pub fn text_qualifier(&self) -> char {
        self.text_qualifier
    }

    /// Return a column delimiter suitable for writing and display.
    ///
    /// Comma is returned if it is configured or if no delimiter is configured
    /// at all; otherwise the first configured delimiter. With an empty set the
    /// returned comma is *not* accepted by [`is_column_delimiter`].
    ///
    /// [`is_column_delimiter`]: CsvFormat::is_column_delimiter
    pub fn column_delimiter(&self) -> char {
        if self.is_column_delimiter(DEFAULT_COLUMN_DELIMITER) {
            return DEFAULT_COLUMN_DELIMITER;
        }
        self.column_delimiters
            .first()
            .copied()
            .unwrap_or(DEFAULT_COLUMN_DELIMITER)
    }

    /// All accepted column delimiters in insertion order
    pub fn column_delimiters(&self) -> &[char] {
        &self.column_delimiters
    }

    /// The configured record delimiter.
    ///
    /// Only consulted when [`record_delimiter_is_default`] is false.
    ///
    /// [`record_delimiter_is_default`]: CsvFormat::record_delimiter_is_default
    pub fn record_delimiter(&self) -> char {
        self.record_delimiter
    }

    pub fn record_delimiter_is_default(&self) -> bool {
        self.record_delimiter_is_default
    }

    pub fn comment_char(&self) -> char {
        self.comment_char
    }

    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    pub fn use_comments(&self) -> bool {
        self.use_comments
    }

    pub fn trim_spaces(&self) -> bool {
        self.trim_spaces
    }

    pub fn compact_spaces(&self) -> bool {
        self.compact_spaces
    }

    pub fn skip_empty_lines(&self) -> bool {
        self.skip_empty_lines
    }

    pub fn merge_delimiters(&self) -> bool {
        self.merge_delimiters
    }

    pub fn use_text_qualifier(&self) -> bool {
        self.use_text_qualifier
    }

    // === Setters ===

    pub fn set_text_qualifier(&mut self, c: char) -> bool {
        replace(&mut self.text_qualifier, c)
    }

    /// Make `c` the only column delimiter
    pub fn set_column_delimiter(&mut self, c: char) -> bool {
        if self.column_delimiters == [c] {
            return false;
        }
        self.column_delimiters.clear();
        self.column_delimiters.push(c);
        true
    }

    /// Accept `c` as an additional column delimiter
    pub fn add_column_delimiter(&mut self, c: char) -> bool {
        if self.is_column_delimiter(c) {
            return false;
        }
        self.column_delimiters.push(c);
        true
    }

    /// Stop accepting `c` as a column delimiter
    pub fn remove_column_delimiter(&mut self, c: char) -> bool {
        let before = self.column_delimiters.len();
        self.column_delimiters.retain(|&d| d != c);
        before != self.column_delimiters.len()
    }

    /// Remove every column delimiter
    pub fn clear_column_delimiters(&mut self) -> bool {
        if self.column_delimiters.is_empty() {
            return false;
        }
        self.column_delimiters.clear();
        true
    }

    pub fn set_record_delimiter(&mut self, c: char) -> bool {
        replace(&mut self.record_delimiter, c)
    }

    pub fn set_record_delimiter_is_default(&mut self, value: bool) -> bool {
        replace(&mut self.record_delimiter_is_default, value)
    }

    pub fn set_comment_char(&mut self, c: char) -> bool {
        replace(&mut self.comment_char, c)
    }

    pub fn set_escape_char(&mut self, c: char) -> bool {
        replace(&mut self.escape_char, c)
    }

    pub fn set_use_comments(&mut self, value: bool) -> bool {
        replace(&mut self.use_comments, value)
    }

    pub fn set_trim_spaces(&mut self, value: bool) -> bool {
        replace(&mut self.trim_spaces, value)
    }

    pub fn set_compact_spaces(&mut self, value: bool) -> bool {
        replace(&mut self.compact_spaces, value)
    }

    pub fn set_skip_empty_lines(&mut self, value: bool) -> bool {
        replace(&mut self.skip_empty_lines, value)
    }

    pub fn set_merge_delimiters(&mut self, value: bool) -> bool {
        replace(&mut self.merge_delimiters, value)
    }

    pub fn set_use_text_qualifier(&mut self, value: bool) -> bool {
        replace(&mut self.use_text_qualifier, value)
    }

    // === Builder-style construction ===

    /// Replace the delimiter set with `c`
    pub fn with_column_delimiter(mut self, c: char) -> Self {
        self.set_column_delimiter(c);
        self
    }

    /// Add `c` to the delimiter set
    pub fn with_additional_column_delimiter(mut self, c: char) -> Self {
        self.add_column_delimiter(c);
        self
    }

    pub fn with_text_qualifier(mut self, c: char) -> Self {
        self.set_text_qualifier(c);
        self
    }

    /// Use `c` as the only record delimiter (turns off CR/LF autodetection)
    pub fn with_record_delimiter(mut self, c: char) -> Self {
        self.set_record_delimiter(c);
        self.set_record_delimiter_is_default(false);
        self
    }

    pub fn with_comment_char(mut self, c: char) -> Self {
        self.set_comment_char(c);
        self
    }

    pub fn with_escape_char(mut self, c: char) -> Self {
        self.set_escape_char(c);
        self
    }

    pub fn with_comments(mut self, value: bool) -> Self {
        self.set_use_comments(value);
        self
    }

    pub fn with_trim_spaces(mut self, value: bool) -> Self {
        self.set_trim_spaces(value);
        self
    }

    pub fn with_compact_spaces(mut self, value: bool) -> Self {
        self.set_compact_spaces(value);
        self
    }

    pub fn with_skip_empty_lines(mut self, value: bool) -> Self {
        self.set_skip_empty_lines(value);
        self
    }

    pub fn with_text_qualifier_on_write(mut self, value: bool) -> Self {
        self.set_use_text_qualifier(value);
        self
    }

    // === Classification ===

    #[inline]
    pub fn is_text_qualifier(&self, c: char) -> bool {
        self.text_qualifier == c
    }

    #[inline]
    pub fn is_column_delimiter(&self, c: char) -> bool {
        self.column_delimiters.contains(&c)
    }

    /// True for the comment character, but only while comments are enabled
    #[inline]
    pub fn is_comment_char(&self, c: char) -> bool {
        self.use_comments && self.comment_char == c
    }

    #[inline]
    pub fn is_escape_char(&self, c: char) -> bool {
        self.escape_char == c
    }

    /// CR or LF when the record delimiter is default, otherwise the configured char
    #[inline]
    pub fn is_record_delimiter(&self, c: char) -> bool {
        if self.record_delimiter_is_default {
            c == CR || c == LF
        } else {
            c == self.record_delimiter
        }
    }

    /// Space or tab that is not itself acting as a delimiter
    #[inline]
    pub fn is_skip_whitespace(&self, c: char) -> bool {
        (c == ' ' || c == '\t') && !self.is_column_delimiter(c) && !self.is_record_delimiter(c)
    }

    // === Text transforms ===

    /// Double every text qualifier and escape character in `s`
    pub fn make_safe<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if !s
            .chars()
            .any(|c: char| self.is_text_qualifier(c) || self.is_escape_char(c))
        {
            return Cow::Borrowed(s);
        }
        let mut out = String::with_capacity(s.len() + 4);
        for c in s.chars() {
            out.push(c);
            if self.is_text_qualifier(c) || self.is_escape_char(c) {
                out.push(c);
            }
        }
        Cow::Owned(out)
    }

    /// Apply the trim/compact whitespace policy to `s`.
    ///
    /// | trim | compact | result |
    /// |------|---------|--------|
    /// | yes  | yes     | runs collapsed to one space, ends trimmed |
    /// | yes  | no      | ends trimmed |
    /// | no   | yes     | runs collapsed, ends kept |
    /// | no   | no      | unchanged |
    pub fn reduce_spaces<'a>(&self, s: &'a str) -> Cow<'a, str> {
        match (self.trim_spaces, self.compact_spaces) {
            (true, true) => Cow::Owned(compact_whitespace(s.trim())),
            (true, false) => Cow::Borrowed(s.trim()),
            (false, true) => Cow::Owned(compact_whitespace(s)),
            (false, false) => Cow::Borrowed(s),
        }
    }

    /// Check whether `s` must be wrapped in the qualifier to survive a round trip
    pub fn needs_qualifier(&self, s: &str) -> bool {
        // A reader skips a line whose first non blank character is a comment
        let head = s.trim_start_matches(|c: char| self.is_skip_whitespace(c));
        if head.starts_with(|c: char| self.is_comment_char(c)) {
            return true;
        }
        s.chars().any(|c| {
            self.is_column_delimiter(c)
                || self.is_record_delimiter(c)
                || c == CR
                || c == LF
                || self.is_text_qualifier(c)
                || self.is_escape_char(c)
        })
    }

    /// The character sequence written between records
    pub fn record_separator(&self) -> char {
        if self.record_delimiter_is_default {
            LF
        } else {
            self.record_delimiter
        }
    }
}

fn compact_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
