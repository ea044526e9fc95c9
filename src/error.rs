use std::{fmt::Display, io};

use serde::{de, ser};
use thiserror::Error;

use crate::{bind::DestinationKind, message::Kind};

/// Errors that can occur while decoding, encoding, or binding RESP data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input was malformed: a missing or broken `\r\n`, an unparsable
    /// length or integer, an unrecognized tag byte, or (while encoding) a
    /// value with no RESP representation. The payload describes which.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A bulk string header announced more bytes than the decoder is
    /// configured to accept. Nothing past the header was read.
    #[error("bulk string of {length} bytes exceeds the maximum of {max} bytes")]
    MessageTooLarge {
        /// The length announced by the header
        length: usize,
        /// The configured maximum
        max: usize,
    },

    /// A header line (tag, content, and `\r\n`) ran past the configured
    /// maximum length without a terminator. At most one read chunk past the
    /// maximum is buffered before this is reported.
    #[error("header line exceeds the maximum of {max} bytes")]
    LineTooLong {
        /// The configured maximum
        max: usize,
    },

    /// Arrays were nested more deeply than the decoder is configured to
    /// accept.
    #[error("arrays nested more than {max} levels deep")]
    NestingTooDeep {
        /// The configured maximum depth
        max: usize,
    },

    /// The byte source ended before a complete message could be read.
    #[error("unexpected end of input")]
    IncompleteInput,

    /// The decoder ran out of buffered data and has no reader to pull more
    /// from. This happens when decoding from an in-memory slice that holds
    /// less than one full message.
    #[error("ran out of buffered data and no reader was configured")]
    MissingReader,

    /// A dynamic bind was given something that can't be written through,
    /// ie, a value that isn't one of the bindable destination types.
    #[error("expected a mutable reference to a bindable destination")]
    ExpectingPointer,

    /// A dynamic bind was given no destination at all.
    #[error("expected a destination, but none was provided")]
    ExpectingDestination,

    /// There is no conversion from this kind of message to this kind of
    /// destination.
    #[error("unsupported conversion: {from} to {to}")]
    UnsupportedConversion {
        /// The kind of the decoded message
        from: Kind,
        /// The kind of the destination
        to: DestinationKind,
    },

    /// An integer didn't fit in the destination type, or (while encoding) in
    /// a signed 64 bit integer, which is the range of all RESP integers.
    #[error("number out of range for the destination")]
    NumberOutOfRange,

    /// Bytes bound to a text destination weren't valid UTF-8.
    #[error("bytes bound to a text destination were not valid UTF-8")]
    InvalidUtf8,

    /// The message was nil. Binding reports nil through
    /// [`Binding`][crate::bind::Binding]; this error only appears when a
    /// caller asks for nil to be treated as a failure with
    /// [`Binding::into_result`][crate::bind::Binding::into_result].
    #[error("message is nil")]
    MessageIsNil,

    /// There was an i/o error in the underlying reader or writer.
    #[error("i/o error")]
    Io(#[from] io::Error),

    /// A `Serialize` or `Deserialize` implementation reported an error of its
    /// own, separate from the RESP protocol.
    #[error("error from Serialize or Deserialize type: {0}")]
    Custom(String),
}

/// Result alias used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl ser::Error for Error {
    #[inline]
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Self::Custom(msg.to_string())
    }
}

impl de::Error for Error {
    #[inline]
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Self::Custom(msg.to_string())
    }
}
