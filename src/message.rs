/*!
The in-memory representation of a single RESP message.

A [`Message`] is produced fresh by each call to
[`Decoder::decode`][crate::de::Decoder::decode], and can be built by hand
and handed to the encoder, which re-serializes it according to its own kind.
*/

use bytes::Bytes;
use displaydoc::Display;
use serde::ser;

/// Name of the newtype struct a nil array serializes through. The RESP
/// [`Serializer`][crate::ser::Serializer] recognizes it and writes `*-1\r\n`;
/// any other serializer just sees a unit.
pub(crate) const NIL_ARRAY_TOKEN: &str = "$respire::NilArray";

/// The type of a [`Message`], corresponding to its RESP tag byte.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// status
    Status,

    /// error
    Error,

    /// integer
    Integer,

    /// bulk string
    Bulk,

    /// array
    Array,
}

impl Kind {
    /// The tag byte that introduces this kind of message on the wire.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Kind::Status => b'+',
            Kind::Error => b'-',
            Kind::Integer => b':',
            Kind::Bulk => b'$',
            Kind::Array => b'*',
        }
    }

    /// Look up the kind for a tag byte, if it's one of the five RESP tags.
    #[inline]
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'+' => Some(Kind::Status),
            b'-' => Some(Kind::Error),
            b':' => Some(Kind::Integer),
            b'$' => Some(Kind::Bulk),
            b'*' => Some(Kind::Array),
            _ => None,
        }
    }
}

/**
A single RESP message.

Each variant holds exactly one payload. Only bulk strings and arrays can be
nil, which is represented by a `None` payload; a nil message is distinct from
an empty bulk string (`$0\r\n\r\n`) or an empty array (`*0\r\n`).

Arrays own their children outright, so a message is always a finite tree.

# Example

```
use respire::{Kind, Message};

let mut message = Message::from(vec![Message::from(1), Message::from("two")]);
assert_eq!(message.kind(), Kind::Array);
assert_eq!(message.as_array().map(|items| items.len()), Some(2));

message.set_nil();
assert!(message.is_nil());
assert_eq!(message.kind(), Kind::Bulk);
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A [simple string](https://redis.io/docs/reference/protocol-spec/#resp-simple-strings),
    /// used for status replies like `+OK`. Not binary safe.
    Status(String),

    /// An [error reply](https://redis.io/docs/reference/protocol-spec/#resp-errors).
    Error(String),

    /// A signed 64 bit [integer](https://redis.io/docs/reference/protocol-spec/#resp-integers).
    Integer(i64),

    /// A binary safe [bulk string](https://redis.io/docs/reference/protocol-spec/#resp-bulk-strings),
    /// or `None` for the nil bulk string.
    Bulk(Option<Bytes>),

    /// An [array](https://redis.io/docs/reference/protocol-spec/#resp-arrays)
    /// of messages, or `None` for the nil array.
    Array(Option<Vec<Message>>),
}

impl Default for Message {
    /// The nil bulk string, which is the protocol's usual "no value".
    #[inline]
    fn default() -> Self {
        Message::Bulk(None)
    }
}

impl Message {
    /// The nil bulk string, `$-1\r\n`.
    #[inline]
    #[must_use]
    pub const fn nil() -> Self {
        Message::Bulk(None)
    }

    /// The nil array, `*-1\r\n`.
    #[inline]
    #[must_use]
    pub const fn nil_array() -> Self {
        Message::Array(None)
    }

    /// The type of this message.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Message::Status(_) => Kind::Status,
            Message::Error(_) => Kind::Error,
            Message::Integer(_) => Kind::Integer,
            Message::Bulk(_) => Kind::Bulk,
            Message::Array(_) => Kind::Array,
        }
    }

    /// True if this is a nil bulk string or a nil array.
    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Message::Bulk(None) | Message::Array(None))
    }

    /// Replace this message with a status.
    #[inline]
    pub fn set_status(&mut self, status: impl Into<String>) {
        *self = Message::Status(status.into());
    }

    /// Replace this message with an error reply.
    #[inline]
    pub fn set_error(&mut self, message: impl Into<String>) {
        *self = Message::Error(message.into());
    }

    /// Replace this message with an integer.
    #[inline]
    pub fn set_integer(&mut self, value: i64) {
        *self = Message::Integer(value);
    }

    /// Replace this message with a bulk string.
    #[inline]
    pub fn set_bytes(&mut self, bytes: impl Into<Bytes>) {
        *self = Message::Bulk(Some(bytes.into()));
    }

    /// Replace this message with an array.
    #[inline]
    pub fn set_array(&mut self, items: Vec<Message>) {
        *self = Message::Array(Some(items));
    }

    /// Replace this message with the nil bulk string.
    #[inline]
    pub fn set_nil(&mut self) {
        *self = Message::nil();
    }

    /// The status text, if this is a status.
    #[inline]
    #[must_use]
    pub fn as_status(&self) -> Option<&str> {
        match self {
            Message::Status(status) => Some(status),
            _ => None,
        }
    }

    /// The error text, if this is an error reply.
    #[inline]
    #[must_use]
    pub fn as_error(&self) -> Option<&str> {
        match self {
            Message::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The value, if this is an integer.
    #[inline]
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match *self {
            Message::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// The payload, if this is a non-nil bulk string.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Message::Bulk(Some(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// The items, if this is a non-nil array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Message]> {
        match self {
            Message::Array(Some(items)) => Some(items),
            _ => None,
        }
    }

    /// Take the items out of a non-nil array.
    #[inline]
    pub fn into_array(self) -> Option<Vec<Message>> {
        match self {
            Message::Array(items) => items,
            _ => None,
        }
    }
}

impl From<i64> for Message {
    #[inline]
    fn from(value: i64) -> Self {
        Message::Integer(value)
    }
}

impl From<&str> for Message {
    #[inline]
    fn from(status: &str) -> Self {
        Message::Status(status.to_owned())
    }
}

impl From<String> for Message {
    #[inline]
    fn from(status: String) -> Self {
        Message::Status(status)
    }
}

impl From<Bytes> for Message {
    #[inline]
    fn from(bytes: Bytes) -> Self {
        Message::Bulk(Some(bytes))
    }
}

impl From<Vec<u8>> for Message {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Message::Bulk(Some(bytes.into()))
    }
}

impl From<&[u8]> for Message {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Message::Bulk(Some(Bytes::copy_from_slice(bytes)))
    }
}

impl From<Vec<Message>> for Message {
    #[inline]
    fn from(items: Vec<Message>) -> Self {
        Message::Array(Some(items))
    }
}

// Errors go through `Result::Err` so that the RESP serializer writes them as
// `-message\r\n`, the same way it treats any other serialized `Err`.
impl ser::Serialize for Message {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Message::Status(status) => serializer.serialize_str(status),
            Message::Error(message) => {
                serializer.serialize_newtype_variant("Result", 1, "Err", message.as_str())
            }
            Message::Integer(value) => serializer.serialize_i64(*value),
            Message::Bulk(Some(bytes)) => serializer.serialize_bytes(bytes),
            Message::Bulk(None) => serializer.serialize_none(),
            Message::Array(Some(items)) => serializer.collect_seq(items),
            Message::Array(None) => serializer.serialize_newtype_struct(NIL_ARRAY_TOKEN, &()),
        }
    }
}
