/*!
Streaming RESP decoder.

A [`Decoder`] wraps any [`io::Read`] and produces one complete [`Message`]
per call to [`decode`][Decoder::decode]. The reader can deliver bytes in
chunks of any size; the decoder blocks inside the read until it has enough
bytes to finish the message, and it never returns a partial tree.

# Example

```
use respire::{de::Decoder, Message};

let input: &[u8] = b"*2\r\n$3\r\nfoo\r\n:42\r\n+OK\r\n";
let mut decoder = Decoder::new(input);

let message = decoder.decode().expect("failed to decode");
assert_eq!(
    message,
    Message::from(vec![Message::from(&b"foo"[..]), Message::from(42)]),
);

let mut status = String::new();
decoder.decode_into(&mut status).expect("failed to decode");
assert_eq!(status, "OK");
```

# Errors

Decoding fails with:

- [`Error::InvalidInput`] for an unrecognized tag byte, a missing or broken
  `\r\n`, a malformed integer or length, or status or error text that isn't
  valid UTF-8.
- [`Error::MessageTooLarge`], [`Error::LineTooLong`], or
  [`Error::NestingTooDeep`] when the input exceeds a [`DecoderConfig`] limit.
- [`Error::IncompleteInput`] when the reader ends before the message does,
  or [`Error::MissingReader`] when a decoder built with
  [`Decoder::from_slice`] runs out of buffered bytes.
- [`Error::Io`] when the reader itself fails.

On failure the stream position is left wherever parsing stopped, so the
decoder shouldn't be used to read the rest of that message. Usually the whole
decoder should be discarded.
*/

pub mod frame;
pub mod parse;
pub mod source;

use std::io::{self, Read};

use tracing::{debug, trace};

use self::{
    frame::FrameReader,
    parse::{parse_length, parse_number},
    source::ByteSource,
};
use crate::{
    bind::{self, Bind, Binding},
    error::{Error, Result},
    message::{Kind, Message},
};

/// Default upper bound on the length of a bulk string: 512 KiB. This is a
/// policy of this library; the protocol itself allows up to 512 MiB.
pub const DEFAULT_MAX_BULK_LENGTH: usize = 512 * 1024;

/// Default upper bound on the length of a header line, including its tag
/// byte and `\r\n`: 64 KiB.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Default upper bound on how deeply arrays can nest.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Default number of bytes requested from the reader at a time.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

// Arrays announce their length up front; don't trust that number with an
// allocation until the elements actually show up.
const MAX_PREALLOCATED_ITEMS: usize = 1024;

/// Limits and tuning for a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Bulk strings longer than this are rejected with
    /// [`Error::MessageTooLarge`] before any of their payload is read.
    pub max_bulk_length: usize,

    /// Header lines (statuses, errors, integers, and lengths) longer than
    /// this, counting the tag byte and `\r\n`, are rejected with
    /// [`Error::LineTooLong`] before more than one extra read chunk is
    /// buffered.
    pub max_line_length: usize,

    /// Arrays nested more deeply than this are rejected with
    /// [`Error::NestingTooDeep`].
    pub max_depth: usize,

    /// How many bytes to request from the reader at a time.
    pub read_chunk_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_bulk_length: DEFAULT_MAX_BULK_LENGTH,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl DecoderConfig {
    /// Set the maximum accepted bulk string length.
    #[inline]
    #[must_use]
    pub const fn with_max_bulk_length(self, max_bulk_length: usize) -> Self {
        Self {
            max_bulk_length,
            ..self
        }
    }

    /// Set the maximum header line length.
    #[inline]
    #[must_use]
    pub const fn with_max_line_length(self, max_line_length: usize) -> Self {
        Self {
            max_line_length,
            ..self
        }
    }

    /// Set the maximum array nesting depth.
    #[inline]
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Set how many bytes are requested from the reader at a time.
    #[inline]
    #[must_use]
    pub const fn with_read_chunk_size(self, read_chunk_size: usize) -> Self {
        Self {
            read_chunk_size,
            ..self
        }
    }
}

/// Decodes RESP messages from a byte stream.
///
/// A decoder owns its buffer, so calls on it are naturally sequential; to
/// share one between threads, wrap it in a `Mutex`.
#[derive(Debug)]
pub struct Decoder<R> {
    frames: FrameReader<R>,
    config: DecoderConfig,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder with the default configuration.
    #[inline]
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    /// Create a decoder with an explicit configuration.
    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            frames: FrameReader::new(
                ByteSource::new(reader, config.read_chunk_size),
                config.max_line_length,
            ),
            config,
        }
    }

    /// Decode the next complete message.
    pub fn decode(&mut self) -> Result<Message> {
        self.decode_at(0)
    }

    /// Decode the next complete message and bind it to `destination`. See
    /// [`bind`][crate::bind::bind] for the conversion rules.
    pub fn decode_into<T: Bind + ?Sized>(&mut self, destination: &mut T) -> Result<Binding> {
        let message = self.decode()?;
        bind::bind(&message, destination)
    }

    fn decode_at(&mut self, depth: usize) -> Result<Message> {
        let header = self.frames.read_header()?;
        trace!(kind = %header.kind, content_length = header.content.len(), "read header");

        match header.kind {
            Kind::Status => text(&header.content).map(Message::Status),
            Kind::Error => text(&header.content).map(Message::Error),
            Kind::Integer => parse_number(&header.content).map(Message::Integer),
            Kind::Bulk => match parse_length(&header.content)? {
                None => Ok(Message::Bulk(None)),
                Some(length) if length > self.config.max_bulk_length => {
                    debug!(length, max = self.config.max_bulk_length, "bulk string too large");
                    Err(Error::MessageTooLarge {
                        length,
                        max: self.config.max_bulk_length,
                    })
                }
                Some(length) => self
                    .frames
                    .read_payload(length)
                    .map(|payload| Message::Bulk(Some(payload))),
            },
            Kind::Array => match parse_length(&header.content)? {
                None => Ok(Message::Array(None)),
                Some(_) if depth >= self.config.max_depth => {
                    debug!(max = self.config.max_depth, "arrays nested too deeply");
                    Err(Error::NestingTooDeep {
                        max: self.config.max_depth,
                    })
                }
                Some(length) => {
                    let mut items = Vec::with_capacity(length.min(MAX_PREALLOCATED_ITEMS));

                    for _ in 0..length {
                        items.push(self.decode_at(depth + 1)?);
                    }

                    Ok(Message::Array(Some(items)))
                }
            },
        }
    }

    /// The configuration this decoder was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Bytes that were pulled from the reader but haven't been decoded yet.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.frames.source().buffered()
    }

    /// Borrow the underlying reader. This is `None` for decoders built with
    /// [`Decoder::from_slice`].
    #[inline]
    pub fn get_ref(&self) -> Option<&R> {
        self.frames.source().get_ref()
    }

    /// Mutably borrow the underlying reader. Reading from it directly will
    /// desynchronize the decoder.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.frames.source_mut().get_mut()
    }

    /// Consume the decoder and return the underlying reader. Any buffered
    /// bytes are lost.
    #[inline]
    pub fn into_inner(self) -> Option<R> {
        self.frames.into_source().into_inner()
    }
}

impl Decoder<io::Empty> {
    /**
    Create a decoder over an in-memory buffer, with no reader behind it.

    Each call to [`decode`][Decoder::decode] consumes one message from the
    buffer. Once it runs out, decoding fails with [`Error::MissingReader`].

    ```
    use respire::{de::Decoder, Error, Message};
    use cool_asserts::assert_matches;

    let mut decoder = Decoder::from_slice(b"+OK\r\n+NO\r\n");

    assert_eq!(decoder.decode().unwrap(), Message::from("OK"));
    assert_eq!(decoder.decode().unwrap(), Message::from("NO"));
    assert_matches!(decoder.decode(), Err(Error::MissingReader));
    ```
    */
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_slice_with_config(data, DecoderConfig::default())
    }

    /// Create a decoder over an in-memory buffer with an explicit
    /// configuration.
    pub fn from_slice_with_config(data: &[u8], config: DecoderConfig) -> Self {
        Self {
            frames: FrameReader::new(ByteSource::from_slice(data), config.max_line_length),
            config,
        }
    }
}

fn text(content: &[u8]) -> Result<String> {
    String::from_utf8(content.to_vec()).map_err(|_| Error::InvalidInput("text line is not UTF-8"))
}

/// Decode the first message in `data`. Anything after it is ignored.
pub fn from_slice(data: &[u8]) -> Result<Message> {
    Decoder::from_slice(data).decode()
}

/// Decode one message from `reader`. Bytes read past the end of the message
/// are discarded along with the decoder; use a [`Decoder`] to read several.
pub fn from_reader<R: Read>(reader: R) -> Result<Message> {
    Decoder::new(reader).decode()
}
