/*!
Streaming RESP encoder.

The encoder is a [`serde::Serializer`]. It maps each value onto a RESP type
as it goes, handing bytes to an [`Output`] as soon as they're computed:

| Rust value | RESP |
|---|---|
| `None`, `()`, unit structs | nil bulk string, `$-1\r\n` |
| strings and `char` | simple string, `+text\r\n`; the text can't contain `\r\n` |
| `Result::Err(text)` | error, `-text\r\n` |
| `Result::Ok(())` | `+OK\r\n` |
| integers and `bool` | integer, `:123\r\n` |
| bytes ([`serde_bytes`]) | bulk string, `$3\r\nabc\r\n` |
| sequences, tuples, tuple structs | array, `*2\r\n...`, elements encoded by this same table |
| unit enum variants | simple string containing the variant name |
| [`Message`][crate::Message] | according to its own kind |

Anything else (floats, maps, structs, and enum variants with data other
than `Result`) fails with [`Error::InvalidInput`]. Because output is
streamed, bytes written before a failure stay written; serialize into a
`Vec<u8>` with [`to_vec`] first if the write needs to be all or nothing.

Note that a `Vec<u8>` or `&[u8]` serializes as a sequence of integers, per
serde convention, so it can't be bound back into a `Vec<u8>`. Use
[`serde_bytes`], or build a [`Message`][crate::Message] with
`Message::from(bytes)`, to get a bulk string.

# Example

```
use serde_bytes::Bytes;

let data = ("foo", 42, Bytes::new(b"\x00\r\n"), Option::<i64>::None);
let encoded = respire::ser::to_vec(&data).expect("failed to encode");

assert_eq!(encoded, b"*4\r\n+foo\r\n:42\r\n$3\r\n\x00\r\n\r\n$-1\r\n");
```
*/

mod output;

use std::{
    fmt::{self, Display, Write as _},
    io,
};

use arrayvec::ArrayString;
use memchr::memmem;
use paste::paste;
use serde::ser;
use tracing::{debug, trace};

pub use self::output::{IoWrite, Output};
use crate::{
    error::{Error, Result},
    message::NIL_ARRAY_TOKEN,
};

const NIL_BULK: &[u8] = b"$-1\r\n";
const NIL_ARRAY: &[u8] = b"*-1\r\n";
const PLAIN_OK: &[u8] = b"+OK\r\n";

/// Serialize a value into a new `Vec<u8>`.
pub fn to_vec<T>(data: &T) -> Result<Vec<u8>>
where
    T: ser::Serialize + ?Sized,
{
    let mut buffer = Vec::new();
    data.serialize(Serializer::new(&mut buffer))?;
    Ok(buffer)
}

/// Serialize a value into an [`io::Write`].
pub fn to_writer<W, T>(writer: W, data: &T) -> Result<()>
where
    W: io::Write,
    T: ser::Serialize + ?Sized,
{
    Encoder::new(writer).encode(data)
}

/**
Encodes any number of values, back to back, into an [`io::Write`].

```
use respire::{ser::Encoder, Message};

let mut encoder = Encoder::new(Vec::new());

encoder.encode("Hello").unwrap();
encoder.encode(&Message::from(&b"World"[..])).unwrap();
encoder.encode(&123).unwrap();

assert_eq!(encoder.into_inner(), b"+Hello\r\n$5\r\nWorld\r\n:123\r\n");
```
*/
#[derive(Debug)]
pub struct Encoder<W> {
    output: IoWrite<W>,
}

impl<W: io::Write> Encoder<W> {
    /// Create an encoder writing to `writer`.
    #[inline]
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            output: IoWrite(writer),
        }
    }

    /// Encode one value.
    pub fn encode<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        value.serialize(Serializer::new(&mut self.output))
    }

    /// Flush the underlying writer.
    #[inline]
    pub fn flush(&mut self) -> Result<()> {
        self.output.0.flush().map_err(Error::Io)
    }

    /// Borrow the underlying writer.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.output.0
    }

    /// Mutably borrow the underlying writer.
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.output.0
    }

    /// Consume the encoder and return the underlying writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.output.0
    }
}

/// How a unit value is written. Inside a `Result::Ok`, unit follows the
/// redis convention for an uninteresting success, `+OK\r\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitAs {
    Nil,
    PlainOk,
}

/// The RESP [`serde::Serializer`]. See the [module docs][self] for how
/// values are mapped.
pub struct Serializer<'a, O> {
    output: &'a mut O,
    unit: UnitAs,
}

impl<'a, O: Output> Serializer<'a, O> {
    /// Create a serializer writing to `output`.
    #[inline]
    #[must_use]
    pub fn new(output: &'a mut O) -> Self {
        Self {
            output,
            unit: UnitAs::Nil,
        }
    }
}

/// Write a tag byte, a decimal value, and `\r\n` in a single write.
fn write_header(output: &mut impl Output, tag: u8, value: impl Display) -> Result<()> {
    // One tag, 20 digits and a sign for i64::MIN, and \r\n
    let mut header: ArrayString<24> = ArrayString::new();

    write!(header, "{}{value}\r\n", char::from(tag)).map_err(|_| Error::NumberOutOfRange)?;
    trace!(header = header.trim_end(), "writing header");
    output.write_bytes(header.as_bytes())
}

#[inline]
fn serialize_number(output: &mut impl Output, value: impl TryInto<i64>) -> Result<()> {
    let value: i64 = value.try_into().map_err(|_| Error::NumberOutOfRange)?;
    write_header(output, b':', value)
}

/// Write a single-line message (simple string or error). The line ends at the
/// first `\r\n`, so the content is checked for one before anything is
/// written. A lone `\r` or `\n` is fine.
fn write_line(output: &mut impl Output, tag: u8, content: &[u8]) -> Result<()> {
    if memmem::find(content, b"\r\n").is_some() {
        debug!(tag = %char::from(tag), "rejected line containing \\r\\n");
        return Err(Error::InvalidInput(
            "simple strings and errors can't contain \\r\\n",
        ));
    }

    output.reserve(content.len() + 3);
    output.write_bytes(&[tag])?;
    output.write_bytes(content)?;
    output.write_bytes(b"\r\n")
}

impl<'a, O: Output> ser::Serializer for Serializer<'a, O> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SerializeSeq<'a, O>;
    type SerializeTuple = SerializeSeq<'a, O>;
    type SerializeTupleStruct = SerializeSeq<'a, O>;

    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = ser::Impossible<(), Error>;

    type SerializeStructVariant = ser::Impossible<(), Error>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;

    #[inline]
    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, i64::from(v))
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        serialize_number(self.output, v)
    }

    #[inline]
    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        Err(Error::InvalidInput("can't serialize floats"))
    }

    #[inline]
    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        Err(Error::InvalidInput("can't serialize floats"))
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        write_line(self.output, b'+', v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        self.output.reserve(v.len() + 16);
        write_header(&mut *self.output, b'$', v.len())?;
        self.output.write_bytes(v)?;
        self.output.write_bytes(b"\r\n")
    }

    #[inline]
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.output.write_bytes(NIL_BULK)
    }

    #[inline]
    fn serialize_some<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ser::Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.output.write_bytes(match self.unit {
            UnitAs::Nil => NIL_BULK,
            UnitAs::PlainOk => PLAIN_OK,
        })
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.output.write_bytes(NIL_BULK)
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(variant)
    }

    #[inline]
    fn serialize_newtype_struct<T: ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ser::Serialize,
    {
        match name {
            NIL_ARRAY_TOKEN => self.output.write_bytes(NIL_ARRAY),
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ser::Serialize,
    {
        match (name, variant) {
            ("Result", "Ok") => value.serialize(Serializer {
                output: self.output,
                unit: UnitAs::PlainOk,
            }),
            ("Result", "Err") => value.serialize(ErrorReplySerializer {
                output: self.output,
            }),
            _ => Err(Error::InvalidInput(
                "can't serialize enums (other than unit variants and Result)",
            )),
        }
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        let len = len.ok_or(Error::InvalidInput(
            "can't serialize sequences of unknown length",
        ))?;

        write_header(&mut *self.output, b'*', len)?;
        Ok(SerializeSeq::new(self.output, len))
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(Error::InvalidInput(
            "can't serialize enums (other than unit variants and Result)",
        ))
    }

    #[inline]
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(Error::InvalidInput("can't serialize maps"))
    }

    #[inline]
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(Error::InvalidInput("can't serialize structs"))
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(Error::InvalidInput(
            "can't serialize enums (other than unit variants and Result)",
        ))
    }

    #[inline]
    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Serializes the elements of a RESP array, checking that exactly as many
/// elements arrive as the header announced.
#[derive(Debug)]
pub struct SerializeSeq<'a, O> {
    remaining: usize,
    output: &'a mut O,
}

impl<'a, O: Output> SerializeSeq<'a, O> {
    #[inline]
    #[must_use]
    fn new(output: &'a mut O, length: usize) -> Self {
        Self {
            output,
            remaining: length,
        }
    }

    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        match self.remaining.checked_sub(1) {
            Some(remain) => self.remaining = remain,
            None => return Err(Error::InvalidInput("too many sequence elements")),
        }

        value.serialize(Serializer::new(&mut *self.output))
    }

    fn finish(self) -> Result<()> {
        match self.remaining {
            0 => Ok(()),
            _ => Err(Error::InvalidInput("too few sequence elements")),
        }
    }
}

impl<O: Output> ser::SerializeSeq for SerializeSeq<'_, O> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ser::Serialize,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<O: Output> ser::SerializeTuple for SerializeSeq<'_, O> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ser::Serialize,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl<O: Output> ser::SerializeTupleStruct for SerializeSeq<'_, O> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ser::Serialize,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

/// An error serializer only accepts strings / bytes or similar payloads and
/// serializes them as Redis error values.
struct ErrorReplySerializer<'a, O> {
    output: &'a mut O,
}

const INVALID_ERROR_PAYLOAD: Error =
    Error::InvalidInput("a Result::Err payload must be a string or unit enum");

macro_rules! reject_primitives {
    ($($type:ident)*) => {
        $(
            paste! {
                #[inline]
                fn [<serialize_ $type>](self, _v: $type) -> Result<Self::Ok, Self::Error> {
                    Err(INVALID_ERROR_PAYLOAD)
                }
            }
        )*
    };
}

impl<O: Output> ser::Serializer for ErrorReplySerializer<'_, O> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ser::Impossible<(), Error>;
    type SerializeTuple = ser::Impossible<(), Error>;
    type SerializeTupleStruct = ser::Impossible<(), Error>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;
    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = ser::Impossible<(), Error>;
    type SerializeStructVariant = ser::Impossible<(), Error>;

    reject_primitives! {
        bool
        i8 i16 i32 i64 i128
        u8 u16 u32 u64 u128
        f32 f64
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        self.serialize_bytes(v.as_bytes())
    }

    #[inline]
    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        write_line(self.output, b'-', v)
    }

    #[inline]
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_some<T: ?Sized>(self, _v: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ser::Serialize,
    {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(name)
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(variant)
    }

    #[inline]
    fn serialize_newtype_struct<T: ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ser::Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ser::Serialize,
    {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(INVALID_ERROR_PAYLOAD)
    }

    #[inline]
    fn collect_str<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: fmt::Display,
    {
        self.serialize_str(&value.to_string())
    }
}
