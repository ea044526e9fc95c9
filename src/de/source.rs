//! Buffered byte source underneath the decoder.

use std::io::{self, ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use memchr::memchr;

use crate::error::{Error, Result};

/// Accumulates bytes from an [`io::Read`] and serves exact-length and
/// delimiter-terminated reads out of them.
///
/// Underlying reads may return any number of bytes; the source keeps pulling
/// until a request can be satisfied. Bytes handed to a caller are split off
/// the front of the buffer and never requested again, and the space they
/// occupied is reclaimed the next time the buffer grows.
///
/// A source built with [`ByteSource::from_slice`] has no reader at all; once
/// its buffered bytes run out, further reads fail with
/// [`Error::MissingReader`].
#[derive(Debug)]
pub struct ByteSource<R> {
    reader: Option<R>,
    buf: BytesMut,

    // Prefix of `buf` already searched for a delimiter without success
    scanned: usize,

    // Staging area for reads, allocated once
    chunk: Vec<u8>,
}

impl<R: Read> ByteSource<R> {
    /// Create a source that pulls up to `chunk_size` bytes at a time from
    /// `reader`.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader: Some(reader),
            buf: BytesMut::with_capacity(chunk_size),
            scanned: 0,
            chunk: vec![0; chunk_size.max(1)],
        }
    }

    /// Pull one chunk from the reader and append it to the buffer, returning
    /// the number of bytes appended. Zero means the reader is exhausted.
    fn fill(&mut self) -> Result<usize> {
        let reader = self.reader.as_mut().ok_or(Error::MissingReader)?;

        loop {
            match reader.read(&mut self.chunk) {
                Ok(n) => {
                    self.buf.extend_from_slice(&self.chunk[..n]);
                    return Ok(n);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::Io(err)),
            }
        }
    }

    /// Read exactly `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        while self.buf.len() < n {
            if self.fill()? == 0 {
                return Err(Error::IncompleteInput);
            }
        }

        self.scanned = self.scanned.saturating_sub(n);
        Ok(self.buf.split_to(n).freeze())
    }

    /// Read everything up to and including the first `delimiter`, which must
    /// be among the first `limit` bytes.
    ///
    /// Once `limit` bytes are buffered without a delimiter, this fails with
    /// [`Error::LineTooLong`] instead of reading further. If the reader runs
    /// dry first, this fails with [`Error::IncompleteInput`] when nothing at
    /// all was buffered (the stream ended cleanly between reads), or
    /// [`Error::InvalidInput`] when there's a dangling, unterminated tail.
    pub fn read_until(&mut self, delimiter: u8, limit: usize) -> Result<Bytes> {
        loop {
            let window = self.buf.len().min(limit);
            let start = self.scanned.min(window);

            if let Some(idx) = memchr(delimiter, &self.buf[start..window]) {
                let end = start + idx + 1;
                self.scanned = 0;
                return Ok(self.buf.split_to(end).freeze());
            }

            if self.buf.len() >= limit {
                return Err(Error::LineTooLong { max: limit });
            }

            self.scanned = self.buf.len();

            if self.fill()? == 0 {
                return Err(match self.buf.is_empty() {
                    true => Error::IncompleteInput,
                    false => Error::InvalidInput("input ended without a line terminator"),
                });
            }
        }
    }

    /// The bytes that have been buffered but not yet consumed.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the underlying reader, if there is one.
    #[inline]
    pub fn get_ref(&self) -> Option<&R> {
        self.reader.as_ref()
    }

    /// Mutably borrow the underlying reader, if there is one.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.reader.as_mut()
    }

    /// Consume the source and return the underlying reader. Any buffered
    /// bytes are lost.
    #[inline]
    pub fn into_inner(self) -> Option<R> {
        self.reader
    }
}

impl ByteSource<io::Empty> {
    /// Create a source over an in-memory buffer, with no reader behind it.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            reader: None,
            buf: BytesMut::from(data),
            scanned: 0,
            chunk: Vec::new(),
        }
    }
}
