//! Header line and payload extraction on top of a [`ByteSource`].

use std::io::Read;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use super::source::ByteSource;
use crate::{
    error::{Error, Result},
    message::Kind,
};

const TERMINATOR: &[u8] = b"\r\n";

/// A parsed RESP "header": the tag byte that opens every message and the
/// content between it and the `\r\n`. For bulk strings and arrays the
/// content is a length; for everything else it's the whole message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// The kind of message this header introduces
    pub kind: Kind,

    /// Everything after the tag byte, not including the `\r\n`
    pub content: Bytes,
}

/// Reads RESP headers and length-prefixed payloads, one at a time.
#[derive(Debug)]
pub struct FrameReader<R> {
    source: ByteSource<R>,
    max_line_length: usize,
}

impl<R: Read> FrameReader<R> {
    /// Create a frame reader on top of a byte source. Header lines, including
    /// the tag and `\r\n`, can be at most `max_line_length` bytes.
    #[inline]
    #[must_use]
    pub fn new(source: ByteSource<R>, max_line_length: usize) -> Self {
        Self {
            source,
            max_line_length,
        }
    }

    /// Read a piece of a header line, with `budget` bytes of the line left.
    fn read_piece(&mut self, budget: usize) -> Result<Bytes> {
        self.source
            .read_until(b'\n', budget)
            .map_err(|err| match err {
                Error::LineTooLong { .. } => {
                    debug!(max = self.max_line_length, "header line too long");
                    Error::LineTooLong {
                        max: self.max_line_length,
                    }
                }
                err => err,
            })
    }

    /// Read one header line.
    ///
    /// Only `\r\n` ends a line. A lone `\r` or `\n` is part of the content,
    /// so the line is accumulated across as many `\n`-terminated pieces as
    /// it takes.
    pub fn read_header(&mut self) -> Result<Header> {
        let mut line = self.read_piece(self.max_line_length)?;

        if !line.ends_with(TERMINATOR) {
            let mut joined = BytesMut::from(line.as_ref());

            while !joined.ends_with(TERMINATOR) {
                let budget = self.max_line_length.saturating_sub(joined.len());
                joined.extend_from_slice(&self.read_piece(budget)?);
            }

            line = joined.freeze();
        }

        let (&tag, _) = line
            .split_first()
            .filter(|_| line.len() > TERMINATOR.len())
            .ok_or(Error::InvalidInput("header line has no tag byte"))?;

        let kind = Kind::from_tag(tag).ok_or_else(|| {
            debug!(tag, "unrecognized tag byte");
            Error::InvalidInput("unrecognized tag byte")
        })?;

        Ok(Header {
            kind,
            content: line.slice(1..line.len() - TERMINATOR.len()),
        })
    }

    /// Read precisely `length` bytes, followed by `\r\n`. The payload is read
    /// by length alone, so it may contain anything, including `\r\n`.
    pub fn read_payload(&mut self, length: usize) -> Result<Bytes> {
        let total = length
            .checked_add(TERMINATOR.len())
            .ok_or(Error::InvalidInput("payload length overflows"))?;

        let mut payload = self.source.read_exact(total)?;

        if !payload.ends_with(TERMINATOR) {
            debug!(length, "payload is not followed by \\r\\n");
            return Err(Error::InvalidInput("payload is missing its terminator"));
        }

        payload.truncate(length);
        Ok(payload)
    }

    /// The underlying byte source.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &ByteSource<R> {
        &self.source
    }

    /// Mutably borrow the underlying byte source.
    #[inline]
    pub fn source_mut(&mut self) -> &mut ByteSource<R> {
        &mut self.source
    }

    /// Consume the frame reader and return its byte source.
    #[inline]
    pub fn into_source(self) -> ByteSource<R> {
        self.source
    }
}
