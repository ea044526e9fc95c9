/*!
Schema-free binding of decoded messages onto native destinations.

A [`Message`] is bound onto a destination by looking up the pair (message
kind, destination kind) in a fixed conversion table:

| Message | `String` | `Vec<u8>` | integers | `bool` | `Vec<T>` | `Message` |
|---|---|---|---|---|---|---|
| status | the text | | | | | a clone |
| error | the text | | | | | a clone |
| integer | decimal text | | range checked | nonzero is `true` | | a clone |
| bulk string | UTF-8 checked | the bytes | strict decimal parse | | | a clone |
| array | | | | | each element, in order | a clone |

Every other pair fails with [`Error::UnsupportedConversion`].

Nil is not an error. Binding a nil message resets the destination to its
zero value and reports [`Binding::is_nil`]; a nil element inside an array is
reset the same way and its position is listed in [`Binding::nil_slots`].
Callers that want nil to be a failure can use [`Binding::into_result`].
`Option<T>` takes nil as `None`, so it never reports it.

# Example

```
use respire::{bind, Message};

let message = Message::from(vec![
    Message::from(&b"10"[..]),
    Message::from(20),
    Message::nil(),
]);

let mut numbers: Vec<u16> = Vec::new();
let binding = bind(&message, &mut numbers).expect("failed to bind");

assert_eq!(numbers, [10, 20, 0]);
assert_eq!(binding.nil_slots(), [vec![2]]);
```

For destinations with more structure than the table above, [`from_message`]
drives any [`serde::Deserialize`] type from a message instead.
*/

mod de;

use std::{any::Any, fmt};

use displaydoc::Display;
use paste::paste;
use tracing::trace;

pub use self::de::{from_message, MessageDeserializer};
use crate::{
    de::{parse::parse_number, Decoder},
    error::{Error, Result},
    message::Message,
};

/// The kind of a [`Destination`], as reported in
/// [`Error::UnsupportedConversion`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    /// text
    Text,

    /// bytes
    Bytes,

    /// integer
    Integer,

    /// boolean
    Boolean,

    /// sequence
    Sequence,

    /// message
    Message,
}

macro_rules! integer_slots {
    ($($type:ident)*) => {
        paste! {
            /// A mutable reference to one of the supported integer types.
            #[derive(Debug)]
            pub enum IntegerSlot<'a> {
                $(
                    #[doc = "An `" $type "` destination"]
                    [<$type:camel>](&'a mut $type),
                )*
            }

            impl IntegerSlot<'_> {
                fn set(&mut self, value: i64) -> Result<()> {
                    match self {
                        $(
                            Self::[<$type:camel>](slot) => {
                                **slot = value.try_into().map_err(|_| Error::NumberOutOfRange)?
                            }
                        )*
                    }

                    Ok(())
                }

                fn reset(&mut self) {
                    match self {
                        $(Self::[<$type:camel>](slot) => **slot = 0,)*
                    }
                }
            }

            $(
                impl<'a> From<&'a mut $type> for IntegerSlot<'a> {
                    #[inline]
                    fn from(slot: &'a mut $type) -> Self {
                        Self::[<$type:camel>](slot)
                    }
                }
            )*
        }
    };
}

integer_slots! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize }

// `u8` is left out here so that `Vec<u8>` can be a bytes destination rather
// than a sequence. It's still an integer destination through `IntegerSlot`
// and `bind_any`.
macro_rules! bind_integers {
    ($($type:ident)*) => {$(
        impl Bind for $type {
            #[inline]
            fn destination(&mut self) -> Destination<'_> {
                Destination::Integer(IntegerSlot::from(self))
            }
        }
    )*};
}

bind_integers! { i8 i16 i32 i64 isize u16 u32 u64 usize }

/// A growable sequence that array elements can be bound into, one slot per
/// element.
pub trait SequenceSlot {
    /// Resize to exactly `items.len()` slots and bind each item into the
    /// slot at the same index.
    fn bind_elements(&mut self, items: &[Message], binding: &mut Binding) -> Result<()>;

    /// Remove every element.
    fn clear(&mut self);
}

impl<T: Bind + Default> SequenceSlot for Vec<T> {
    fn bind_elements(&mut self, items: &[Message], binding: &mut Binding) -> Result<()> {
        self.truncate(items.len());
        self.resize_with(items.len(), T::default);

        self.iter_mut()
            .zip(items)
            .enumerate()
            .try_for_each(|(index, (slot, item))| {
                binding.path.push(index);
                slot.bind_message(item, binding)?;
                binding.path.pop();
                Ok(())
            })
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

/// A mutable reference to something a [`Message`] can be bound onto. The set
/// of destinations is closed; each one is matched against each message kind
/// in [`bind`].
pub enum Destination<'a> {
    /// A text destination
    Text(&'a mut String),

    /// A binary destination
    Bytes(&'a mut Vec<u8>),

    /// An integer destination
    Integer(IntegerSlot<'a>),

    /// A boolean destination
    Boolean(&'a mut bool),

    /// A sequence destination, receiving the elements of an array
    Sequence(&'a mut dyn SequenceSlot),

    /// A passthrough destination, receiving the message itself
    Message(&'a mut Message),
}

impl Destination<'_> {
    /// The kind of this destination.
    #[must_use]
    pub fn kind(&self) -> DestinationKind {
        match self {
            Destination::Text(_) => DestinationKind::Text,
            Destination::Bytes(_) => DestinationKind::Bytes,
            Destination::Integer(_) => DestinationKind::Integer,
            Destination::Boolean(_) => DestinationKind::Boolean,
            Destination::Sequence(_) => DestinationKind::Sequence,
            Destination::Message(_) => DestinationKind::Message,
        }
    }

    /// Reset the destination to its zero value, in response to `nil`. A
    /// passthrough destination receives `nil` itself.
    fn reset(self, nil: &Message) {
        match self {
            Destination::Text(slot) => slot.clear(),
            Destination::Bytes(slot) => slot.clear(),
            Destination::Integer(mut slot) => slot.reset(),
            Destination::Boolean(slot) => *slot = false,
            Destination::Sequence(slot) => slot.clear(),
            Destination::Message(slot) => slot.clone_from(nil),
        }
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Destination").field(&self.kind()).finish()
    }
}

/**
A native type that messages can be bound onto.

This is implemented for `String`, `Vec<u8>`, `bool`, [`Message`], the
integer types other than `u8`, `Vec<T>` of any bindable `T`, and
`Option<T>`. Other types can opt in by handing out one of those
destinations:

```
use respire::{bind::{Bind, Destination}, bind, Message};

#[derive(Debug, Default)]
struct Key(String);

impl Bind for Key {
    fn destination(&mut self) -> Destination<'_> {
        Destination::Text(&mut self.0)
    }
}

let mut key = Key::default();
bind(&Message::from(&b"user:1"[..]), &mut key).expect("failed to bind");
assert_eq!(key.0, "user:1");
```
*/
pub trait Bind {
    /// The destination that messages are written into.
    fn destination(&mut self) -> Destination<'_>;

    /// Bind a message into this value, recording any nils in `binding`.
    /// Most types should leave this as is.
    fn bind_message(&mut self, message: &Message, binding: &mut Binding) -> Result<()> {
        bind_destination(message, self.destination(), binding)
    }
}

impl Bind for String {
    #[inline]
    fn destination(&mut self) -> Destination<'_> {
        Destination::Text(self)
    }
}

impl Bind for Vec<u8> {
    #[inline]
    fn destination(&mut self) -> Destination<'_> {
        Destination::Bytes(self)
    }
}

impl Bind for bool {
    #[inline]
    fn destination(&mut self) -> Destination<'_> {
        Destination::Boolean(self)
    }
}

impl Bind for Message {
    #[inline]
    fn destination(&mut self) -> Destination<'_> {
        Destination::Message(self)
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    #[inline]
    fn destination(&mut self) -> Destination<'_> {
        Destination::Sequence(self)
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    #[inline]
    fn destination(&mut self) -> Destination<'_> {
        self.get_or_insert_with(T::default).destination()
    }

    fn bind_message(&mut self, message: &Message, binding: &mut Binding) -> Result<()> {
        match message.is_nil() {
            true => {
                *self = None;
                Ok(())
            }
            false => self
                .get_or_insert_with(T::default)
                .bind_message(message, binding),
        }
    }
}

/// The outcome of a successful bind: whether the message, or any array
/// elements inside it, were nil.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Binding {
    nil: bool,
    nil_slots: Vec<Vec<usize>>,
    path: Vec<usize>,
}

impl Binding {
    fn record_nil(&mut self) {
        match self.path.is_empty() {
            true => self.nil = true,
            false => self.nil_slots.push(self.path.clone()),
        }
    }

    /// True if the message itself was nil, in which case the destination was
    /// reset to its zero value.
    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.nil
    }

    /// The positions of nil elements inside a bound array, as index paths
    /// from the outermost array. Each of these slots was reset to its zero
    /// value.
    #[inline]
    #[must_use]
    pub fn nil_slots(&self) -> &[Vec<usize>] {
        &self.nil_slots
    }

    /// True if neither the message nor anything inside it was nil.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.nil && self.nil_slots.is_empty()
    }

    /// Treat a nil message as an error.
    #[inline]
    pub fn into_result(self) -> Result<Self> {
        match self.nil {
            true => Err(Error::MessageIsNil),
            false => Ok(self),
        }
    }
}

fn bind_destination(
    message: &Message,
    destination: Destination<'_>,
    binding: &mut Binding,
) -> Result<()> {
    let to = destination.kind();

    if message.is_nil() {
        trace!(%to, "binding nil");
        destination.reset(message);
        binding.record_nil();
        return Ok(());
    }

    match (message, destination) {
        (_, Destination::Message(slot)) => slot.clone_from(message),

        (Message::Status(text) | Message::Error(text), Destination::Text(slot)) => {
            slot.clone_from(text)
        }
        (&Message::Integer(value), Destination::Text(slot)) => *slot = value.to_string(),
        (Message::Bulk(Some(bytes)), Destination::Text(slot)) => {
            let text = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
            slot.clear();
            slot.push_str(text);
        }

        (Message::Bulk(Some(bytes)), Destination::Bytes(slot)) => {
            slot.clear();
            slot.extend_from_slice(bytes);
        }

        (&Message::Integer(value), Destination::Integer(mut slot)) => slot.set(value)?,
        (Message::Bulk(Some(bytes)), Destination::Integer(mut slot)) => {
            slot.set(parse_number(bytes)?)?
        }

        (&Message::Integer(value), Destination::Boolean(slot)) => *slot = value != 0,

        (Message::Array(Some(items)), Destination::Sequence(slot)) => {
            slot.bind_elements(items, binding)?
        }

        _ => {
            return Err(Error::UnsupportedConversion {
                from: message.kind(),
                to,
            })
        }
    }

    Ok(())
}

/// Bind a message onto a destination. See the [module docs][self] for the
/// conversion rules.
pub fn bind<T: Bind + ?Sized>(message: &Message, destination: &mut T) -> Result<Binding> {
    let mut binding = Binding::default();
    destination.bind_message(message, &mut binding)?;
    Ok(binding)
}

macro_rules! try_bind_as {
    ($message:expr, $destination:expr, $($type:ty),* $(,)?) => {$(
        if let Some(destination) = $destination.downcast_mut::<$type>() {
            return bind($message, destination);
        }
    )*};
}

/**
Bind a message onto a destination whose type is only known at runtime.

The destination must be one of the bindable types: `String`, `Vec<u8>`,
`bool`, any integer type (including `u8`), [`Message`], or a `Vec` of one of
those. Anything else fails with [`Error::ExpectingPointer`], and no
destination at all fails with [`Error::ExpectingDestination`].

```
use std::any::Any;
use respire::{bind::bind_any, Message};

let mut count = 0u8;
bind_any(&Message::from(7), Some(&mut count as &mut dyn Any)).expect("failed to bind");
assert_eq!(count, 7);
```
*/
pub fn bind_any(message: &Message, destination: Option<&mut dyn Any>) -> Result<Binding> {
    let destination = destination.ok_or(Error::ExpectingDestination)?;

    try_bind_as! {
        message, destination,
        String, Vec<u8>, bool, Message,
        i8, i16, i32, i64, isize, u16, u32, u64, usize,
        Vec<String>, Vec<Vec<u8>>, Vec<bool>, Vec<Message>,
        Vec<i8>, Vec<i16>, Vec<i32>, Vec<i64>, Vec<isize>, Vec<u16>, Vec<u32>, Vec<u64>, Vec<usize>,
    }

    if let Some(slot) = destination.downcast_mut::<u8>() {
        let mut binding = Binding::default();
        bind_destination(message, Destination::Integer(slot.into()), &mut binding)?;
        return Ok(binding);
    }

    Err(Error::ExpectingPointer)
}

/// Decode the first message in `input` and bind it onto `destination`.
pub fn unmarshal<T: Bind + ?Sized>(input: &[u8], destination: &mut T) -> Result<Binding> {
    Decoder::from_slice(input).decode_into(destination)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use cool_asserts::assert_matches;
    use serde_bytes::Bytes as ByteSlice;

    use super::*;
    use crate::{message::Kind, ser::to_vec};

    fn bulk(data: &[u8]) -> Message {
        Message::Bulk(Some(Bytes::copy_from_slice(data)))
    }

    fn array(items: Vec<Message>) -> Message {
        Message::Array(Some(items))
    }

    macro_rules! bind_tests {
        ($($name:ident: $message:expr => $type:ty = $expected:expr;)*) => {$(
            #[test]
            fn $name() {
                let mut destination = <$type>::default();
                let binding = bind(&$message, &mut destination).expect("failed to bind");

                assert!(binding.is_complete());
                assert_eq!(destination, $expected);
            }
        )*};
    }

    bind_tests! {
        status_to_text: Message::from("OK") => String = "OK";
        error_to_text: Message::Error("ERR bad".to_owned()) => String = "ERR bad";
        integer_to_text: Message::from(-123) => String = "-123";
        bulk_to_text: bulk("♥".as_bytes()) => String = "♥";
        bulk_to_bytes: bulk(b"\x00\x01\x02") => Vec<u8> = [0, 1, 2];
        bulk_with_newline_to_bytes: bulk(b"a\r\nb") => Vec<u8> = b"a\r\nb";
        integer_to_i64: Message::from(123) => i64 = 123;
        integer_to_u32: Message::from(123) => u32 = 123;
        integer_to_isize: Message::from(-5) => isize = -5;
        bulk_to_integer: bulk(b"456") => i32 = 456;
        negative_bulk_to_integer: bulk(b"-456") => i64 = -456;
        integer_to_true: Message::from(123) => bool = true;
        integer_to_false: Message::from(0) => bool = false;
        negative_to_true: Message::from(-1) => bool = true;
        array_to_vec: array(vec![Message::from(1), Message::from(2), Message::from(3)]) => Vec<i64> = [1, 2, 3];
        mixed_array_to_text: array(vec![Message::from("a"), bulk(b"b"), Message::from(3)]) => Vec<String> = ["a", "b", "3"];
        empty_array: array(vec![]) => Vec<i64> = Vec::<i64>::new();
        nested_array: array(vec![array(vec![Message::from(1)]), array(vec![])]) => Vec<Vec<i16>> = [vec![1], vec![]];
        passthrough: array(vec![Message::from(1)]) => Message = array(vec![Message::from(1)]);
        option_some: Message::from(5) => Option<i64> = Some(5);
        option_none: Message::nil() => Option<i64> = None;
    }

    macro_rules! unsupported_tests {
        ($($name:ident: $message:expr => $type:ty = $from:ident to $to:ident;)*) => {$(
            #[test]
            fn $name() {
                let mut destination = <$type>::default();
                assert_matches!(
                    bind(&$message, &mut destination),
                    Err(Error::UnsupportedConversion {
                        from: Kind::$from,
                        to: DestinationKind::$to,
                    })
                );
            }
        )*};
    }

    unsupported_tests! {
        status_to_integer: Message::from("5") => i64 = Status to Integer;
        status_to_bytes: Message::from("abc") => Vec<u8> = Status to Bytes;
        error_to_bool: Message::Error("ERR".to_owned()) => bool = Error to Boolean;
        integer_to_bytes: Message::from(1) => Vec<u8> = Integer to Bytes;
        integer_to_sequence: Message::from(1) => Vec<i64> = Integer to Sequence;
        bulk_to_bool: bulk(b"1") => bool = Bulk to Boolean;
        bulk_to_sequence: bulk(b"abc") => Vec<String> = Bulk to Sequence;
        array_to_text: array(vec![]) => String = Array to Text;
        array_to_integer: array(vec![Message::from(1)]) => i64 = Array to Integer;
    }

    #[test]
    fn integer_out_of_range() {
        let mut destination = 0u16;
        assert_matches!(
            bind(&Message::from(70000), &mut destination),
            Err(Error::NumberOutOfRange)
        );

        let mut destination = 0u64;
        assert_matches!(
            bind(&Message::from(-1), &mut destination),
            Err(Error::NumberOutOfRange)
        );
    }

    #[test]
    fn bulk_to_integer_is_strict() {
        let mut destination = 0i64;
        assert_matches!(
            bind(&bulk(b"12a3"), &mut destination),
            Err(Error::InvalidInput(_))
        );
        assert_matches!(
            bind(&bulk(b" 12"), &mut destination),
            Err(Error::InvalidInput(_))
        );
    }

    #[test]
    fn invalid_utf8_to_text() {
        let mut destination = String::new();
        assert_matches!(
            bind(&bulk(b"\xff\xfe"), &mut destination),
            Err(Error::InvalidUtf8)
        );
    }

    #[test]
    fn nil_resets_destination() {
        let mut text = String::from("stale");
        let binding = bind(&Message::nil(), &mut text).expect("failed to bind");

        assert!(binding.is_nil());
        assert!(!binding.is_complete());
        assert_eq!(text, "");

        let mut number = 42i32;
        assert!(bind(&Message::nil_array(), &mut number).unwrap().is_nil());
        assert_eq!(number, 0);

        let mut items = vec![1, 2, 3];
        assert!(bind(&Message::nil_array(), &mut items).unwrap().is_nil());
        assert!(items.is_empty());
    }

    #[test]
    fn nil_into_result() {
        let mut text = String::new();

        assert_matches!(
            bind(&Message::nil(), &mut text).and_then(Binding::into_result),
            Err(Error::MessageIsNil)
        );
        assert_matches!(
            bind(&Message::from("OK"), &mut text).and_then(Binding::into_result),
            Ok(binding) => assert!(binding.is_complete())
        );
    }

    #[test]
    fn nil_passthrough() {
        let mut message = Message::from(5);
        let binding = bind(&Message::nil_array(), &mut message).expect("failed to bind");

        assert!(binding.is_nil());
        assert_eq!(message, Message::nil_array());
    }

    #[test]
    fn nil_slots_are_reported() {
        let message = array(vec![
            bulk(b"a"),
            Message::nil(),
            array(vec![Message::from(1), Message::nil_array()]),
        ]);

        let mut destination: Vec<Message> = Vec::new();
        let binding = bind(&message, &mut destination).expect("failed to bind");
        assert_eq!(binding.nil_slots(), [vec![1]]);

        let message = array(vec![
            array(vec![bulk(b"a"), Message::nil()]),
            Message::nil_array(),
            array(vec![Message::nil(), bulk(b"d")]),
        ]);

        let mut destination: Vec<Vec<String>> = vec![vec!["stale".to_owned()]];
        let binding = bind(&message, &mut destination).expect("failed to bind");

        assert!(!binding.is_nil());
        assert_eq!(binding.nil_slots(), [vec![0, 1], vec![1], vec![2, 0]]);
        assert_eq!(destination, [vec!["a", ""], vec![], vec!["", "d"]]);
    }

    #[test]
    fn option_elements_absorb_nil() {
        let message = array(vec![Message::from(1), Message::nil(), Message::from(3)]);

        let mut destination: Vec<Option<i64>> = Vec::new();
        let binding = bind(&message, &mut destination).expect("failed to bind");

        assert!(binding.is_complete());
        assert_eq!(destination, [Some(1), None, Some(3)]);
    }

    #[test]
    fn sequence_shrinks_to_fit() {
        let mut destination = vec![9, 9, 9, 9];
        let message = array(vec![Message::from(1)]);
        let binding = bind(&message, &mut destination).expect("failed to bind");

        assert!(binding.is_complete());
        assert_eq!(destination, [1]);
    }

    #[test]
    fn failed_element_aborts_bind() {
        let message = array(vec![Message::from(1), Message::from("two")]);
        let mut destination: Vec<i64> = Vec::new();

        assert_matches!(
            bind(&message, &mut destination),
            Err(Error::UnsupportedConversion {
                from: Kind::Status,
                to: DestinationKind::Integer,
            })
        );
    }

    #[test]
    fn dynamic_bind() {
        let mut text = String::new();
        let binding = bind_any(&Message::from("OK"), Some(&mut text as &mut dyn Any))
            .expect("failed to bind");
        assert!(binding.is_complete());
        assert_eq!(text, "OK");

        let mut byte = 0u8;
        let binding = bind_any(&Message::from(200), Some(&mut byte as &mut dyn Any))
            .expect("failed to bind");
        assert!(binding.is_complete());
        assert_eq!(byte, 200);

        let mut items: Vec<i64> = Vec::new();
        let message = array(vec![Message::from(1)]);
        let binding =
            bind_any(&message, Some(&mut items as &mut dyn Any)).expect("failed to bind");
        assert!(binding.is_complete());
        assert_eq!(items, [1]);
    }

    #[test]
    fn dynamic_bind_without_destination() {
        assert_matches!(
            bind_any(&Message::from(1), None),
            Err(Error::ExpectingDestination)
        );
    }

    #[test]
    fn dynamic_bind_to_unbindable() {
        let mut unbindable = 1.5f64;
        assert_matches!(
            bind_any(&Message::from(1), Some(&mut unbindable as &mut dyn Any)),
            Err(Error::ExpectingPointer)
        );
    }

    #[test]
    fn unmarshal_binary_safe() {
        let mut destination: Vec<u8> = Vec::new();
        let binding =
            unmarshal(b"$3\r\n\x00\x01\x02\r\n", &mut destination).expect("failed to unmarshal");

        assert!(binding.is_complete());
        assert_eq!(destination, [0, 1, 2]);
    }

    #[test]
    fn unmarshal_integer_three_ways() {
        let mut number = 0i64;
        let mut text = String::new();
        let mut flag = false;

        assert!(unmarshal(b":123\r\n", &mut number).unwrap().is_complete());
        assert!(unmarshal(b":123\r\n", &mut text).unwrap().is_complete());
        assert!(unmarshal(b":123\r\n", &mut flag).unwrap().is_complete());

        assert_eq!(number, 123);
        assert_eq!(text, "123");
        assert!(flag);
    }

    #[test]
    fn unmarshal_nil_array() {
        let mut destination = vec![String::from("stale")];
        let binding = unmarshal(b"*-1\r\n", &mut destination).expect("failed to unmarshal");

        assert!(binding.is_nil());
        assert!(destination.is_empty());
    }

    fn round_trip<T, U>(value: &T) -> U
    where
        T: serde::Serialize + ?Sized,
        U: Bind + Default,
    {
        let encoded = to_vec(value).expect("failed to encode");
        let mut destination = U::default();
        let binding = unmarshal(&encoded, &mut destination).expect("failed to bind");
        assert!(binding.is_complete());
        destination
    }

    #[test]
    fn round_trips() {
        assert_eq!(round_trip::<_, String>("hello world"), "hello world");
        assert_eq!(round_trip::<_, String>(""), "");
        assert_eq!(
            round_trip::<_, Vec<u8>>(ByteSlice::new(b"\r\n\x00\xff")),
            b"\r\n\x00\xff"
        );
        assert_eq!(round_trip::<_, i64>(&i64::MIN), i64::MIN);
        assert_eq!(round_trip::<_, i64>(&-1), -1);
        assert_eq!(round_trip::<_, Vec<i32>>(&[1, 2, 3]), [1, 2, 3]);
        assert_eq!(
            round_trip::<_, Vec<String>>(&("a", 1, ByteSlice::new(b"c"))),
            ["a", "1", "c"]
        );
        assert_eq!(round_trip::<_, Option<String>>(&Option::<&str>::None), None);
        assert_eq!(round_trip::<_, Message>(&Message::nil_array()), Message::nil_array());
    }
}
