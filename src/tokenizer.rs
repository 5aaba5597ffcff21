//! Word Tokenizers
//!
//! This module provides the two token readers the replacement scanner is
//! built on: a whitespace-delimited reader for exact matching and an
//! alphanumeric-run reader for wildcard matching. Both operate on raw bytes
//! and never read past the token buffer limit before checking termination.

use std::io::{self, BufRead, ErrorKind};

/// Default token buffer capacity in bytes.
///
/// Words longer than this are handled as a sequence of [`WordRead::Overflow`]
/// fragments, each checked against the search text independently, so a match
/// longer than the limit cannot occur.
pub const DEFAULT_TOKEN_LIMIT: usize = 1000;

/// Outcome of a single token read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRead {
    /// End of stream. The buffered token may be partial; there is no
    /// boundary byte.
    Eof,
    /// Token terminated by this boundary byte. The byte has been consumed
    /// from the stream and is not part of the token.
    Boundary(u8),
    /// The buffer reached its limit before a boundary was seen. No boundary
    /// byte was consumed; the next read continues the same logical word.
    Overflow,
}

/// Streaming token reader with a bounded, reusable buffer.
///
/// The token bytes from the most recent read are available through
/// [`WordReader::word`] until the next read call.
pub struct WordReader<R> {
    inner: R,
    buf: Vec<u8>,
    limit: usize,
}

impl<R: BufRead> WordReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_limit(inner, DEFAULT_TOKEN_LIMIT)
    }

    /// Create a reader with a custom buffer limit (must be at least 1).
    pub fn with_limit(inner: R, limit: usize) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(limit.min(DEFAULT_TOKEN_LIMIT)),
            limit,
        }
    }

    /// Read the next whitespace-delimited word.
    pub fn read_word(&mut self) -> io::Result<WordRead> {
        self.read_token(|b| b.is_ascii_whitespace())
    }

    /// Read the next alphanumeric run. Any non-alphanumeric byte, whitespace
    /// and punctuation alike, is a boundary.
    pub fn read_wild_word(&mut self) -> io::Result<WordRead> {
        self.read_token(|b| !b.is_ascii_alphanumeric())
    }

    /// Token bytes from the most recent read.
    pub fn word(&self) -> &[u8] {
        &self.buf
    }

    /// Release the underlying stream, discarding the buffered token.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_token(&mut self, is_boundary: impl Fn(u8) -> bool) -> io::Result<WordRead> {
        self.buf.clear();
        while self.buf.len() < self.limit {
            match next_byte(&mut self.inner)? {
                None => return Ok(WordRead::Eof),
                Some(b) if is_boundary(b) => return Ok(WordRead::Boundary(b)),
                Some(b) => self.buf.push(b),
            }
        }
        Ok(WordRead::Overflow)
    }
}

/// Pull a single byte off a buffered reader, retrying on interruption.
fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok([]) => return Ok(None),
            Ok(available) => {
                let b = available[0];
                reader.consume(1);
                return Ok(Some(b));
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
