/*!
`respire` is a streaming implementation of
[RESP](https://redis.io/docs/reference/protocol-spec/), the Redis
Serialization Protocol, with a schema-free binder for reading decoded
messages into native Rust values.

The crate has four parts:

- A [decoder][de::Decoder], which reads one complete [`Message`] at a time
  from any [`std::io::Read`], however the bytes happen to be chunked.
- The [`Message`] tree itself: statuses, errors, integers, bulk strings
  and arrays, with nil bulk strings and arrays kept distinct from empty ones.
- An [encoder][ser::Encoder], which is a [serde] serializer that writes
  values (including [`Message`]s) to any [`std::io::Write`] as it goes.
- A [binder][bind], which converts a [`Message`] onto a `String`, `Vec<u8>`,
  integer, `bool`, `Vec` of those, or back into a [`Message`], and reports
  nil rather than failing on it.

# Example

```
use respire::{bind, de::Decoder, ser::Encoder, Message};
use serde_bytes::Bytes;

let mut encoder = Encoder::new(Vec::new());
encoder.encode(&(Bytes::new(b"SET"), Bytes::new(b"key"), Bytes::new(b"value"))).unwrap();
encoder.encode(&Ok::<(), String>(())).unwrap();
let wire = encoder.into_inner();

assert_eq!(
    wire,
    b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n+OK\r\n",
);

let mut decoder = Decoder::new(wire.as_slice());

let command = decoder.decode().expect("failed to decode");
let mut words: Vec<String> = Vec::new();
bind(&command, &mut words).expect("failed to bind");
assert_eq!(words, ["SET", "key", "value"]);

assert_eq!(decoder.decode().unwrap(), Message::from("OK"));
```

# Supported types

The [encoder][ser] handles:

- `bool` and all integers (as RESP integers, which must fit in an `i64`).
- Strings and `char`s, as simple strings. These can't contain `\r\n`.
- Bytes, via [`serde_bytes`], as bulk strings. A plain `Vec<u8>` or `&[u8]`
  is a sequence of integers to serde, so it becomes an array of RESP
  integers instead.
- Unit and `None`, as the nil bulk string.
- Sequences, tuples, and tuple structs, as arrays.
- [`Result`]: `Err` as an error reply, `Ok(())` as `+OK`.
- Unit variants, as simple strings.

Floats, maps, structs, and other enums aren't supported.

# Errors

Every fallible operation returns the crate-wide [`Error`]. Decoding is all or
nothing: a call to [`decode`][de::Decoder::decode] either returns a whole
message or fails, and it never returns part of a tree. Nil isn't an error
while binding; see [`bind::Binding`].
*/

#![deny(missing_docs)]

pub mod bind;
pub mod de;
mod error;
pub mod message;
pub mod ser;

pub use bind::{bind, unmarshal};
pub use de::Decoder;
pub use error::{Error, Result};
pub use message::{Kind, Message};
pub use ser::Encoder;

/// Serialize a value into a new `Vec<u8>`. This is the same as
/// [`ser::to_vec`].
///
/// A plain `Vec<u8>` or `&[u8]` is encoded as an array of integers, one per
/// byte, and can't be bound back into a `Vec<u8>`. Wrap it in
/// [`serde_bytes::ByteBuf`] (or [`serde_bytes::Bytes`]), or convert it with
/// `Message::from`, to get a bulk string.
///
/// ```
/// use serde_bytes::Bytes;
///
/// assert_eq!(respire::marshal(&["foo", "bar"]).unwrap(), b"*2\r\n+foo\r\n+bar\r\n");
/// assert_eq!(respire::marshal(&b"hi"[..]).unwrap(), b"*2\r\n:104\r\n:105\r\n");
/// assert_eq!(respire::marshal(Bytes::new(b"hi")).unwrap(), b"$2\r\nhi\r\n");
/// ```
#[inline]
pub fn marshal<T>(value: &T) -> Result<Vec<u8>>
where
    T: serde::Serialize + ?Sized,
{
    ser::to_vec(value)
}
