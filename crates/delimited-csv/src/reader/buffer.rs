//! Chunked character buffer with a one character cursor

use std::io::{self, Read};
use std::mem;

/// Number of bytes pulled from the source per chunk (10 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 10_485_760;

const REPLACEMENT: char = '\u{FFFD}';

/// Decodes a byte source into characters one chunk at a time.
///
/// The cursor only moves forward. When it walks off the end of the decoded
/// chunk the next chunk is read on the following [`current`](Self::current)
/// call. The source is dropped as soon as it reports end of stream.
pub(crate) struct CharBuffer {
    source: Option<Box<dyn Read>>,
    chunk_size: usize,
    chars: Vec<char>,
    pos: usize,
    last: Option<char>,
    /// Incomplete UTF-8 sequence at the end of the previous chunk
    pending: Vec<u8>,
    /// Replacements made since the counter was last taken
    invalid_utf8: usize,
}

impl CharBuffer {
    /// A buffer with nothing to read
    pub fn empty(chunk_size: usize) -> Self {
        Self {
            source: None,
            chunk_size: chunk_size.max(1),
            chars: Vec::new(),
            pos: 0,
            last: None,
            pending: Vec::new(),
            invalid_utf8: 0,
        }
    }

    pub fn from_reader(source: Box<dyn Read>, chunk_size: usize) -> Self {
        Self {
            source: Some(source),
            ..Self::empty(chunk_size)
        }
    }

    /// Text that is already decoded needs no source
    pub fn from_text(text: &str, chunk_size: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            ..Self::empty(chunk_size)
        }
    }

    /// True when decoded characters remain or the source may yield more
    pub fn can_read(&self) -> bool {
        self.pos < self.chars.len() || self.source.is_some()
    }

    /// Check whether a character is available, reading a chunk if needed
    pub fn has_char(&mut self) -> io::Result<bool> {
        while self.pos >= self.chars.len() {
            if !self.fill()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The character under the cursor, or `None` at end of stream
    pub fn current(&mut self) -> io::Result<Option<char>> {
        if self.has_char()? {
            Ok(Some(self.chars[self.pos]))
        } else {
            Ok(None)
        }
    }

    /// Step past the current character. Does nothing at end of stream.
    pub fn advance(&mut self) -> io::Result<()> {
        if self.has_char()? {
            self.last = Some(self.chars[self.pos]);
            self.pos += 1;
        }
        Ok(())
    }

    /// The character most recently stepped past
    pub fn last(&self) -> Option<char> {
        self.last
    }

    /// Take the count of invalid UTF-8 sequences replaced so far
    pub fn take_invalid_utf8(&mut self) -> usize {
        mem::take(&mut self.invalid_utf8)
    }

    /// Read and decode the next chunk. Returns false at end of stream.
    fn fill(&mut self) -> io::Result<bool> {
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };

        let mut bytes = mem::take(&mut self.pending);
        let carried = bytes.len();
        let read = source
            .by_ref()
            .take(self.chunk_size as u64)
            .read_to_end(&mut bytes);
        let read = match read {
            Ok(n) => n,
            Err(e) => {
                self.source = None;
                return Err(e);
            }
        };

        self.chars.clear();
        self.pos = 0;

        if read == 0 {
            self.source = None;
            if carried > 0 {
                // Stream ended in the middle of a multi-byte sequence
                self.chars.push(REPLACEMENT);
                self.invalid_utf8 += 1;
                return Ok(true);
            }
            return Ok(false);
        }

        self.decode(&bytes);
        // A chunk holding only the start of a sequence decodes to nothing;
        // the caller loops and reads more.
        Ok(true)
    }

    fn decode(&mut self, mut bytes: &[u8]) {
        loop {
            match std::str::from_utf8(bytes) {
                Ok(s) => {
                    self.chars.extend(s.chars());
                    return;
                }
                Err(e) => {
                    let (valid, rest) = bytes.split_at(e.valid_up_to());
                    if let Ok(s) = std::str::from_utf8(valid) {
                        self.chars.extend(s.chars());
                    }
                    match e.error_len() {
                        None => {
                            self.pending = rest.to_vec();
                            return;
                        }
                        Some(len) => {
                            self.chars.push(REPLACEMENT);
                            self.invalid_utf8 += 1;
                            bytes = &rest[len..];
                        }
                    }
                }
            }
        }
    }
}
