/*!
A [`serde::Deserializer`] over a decoded [`Message`], for binding onto any
`Deserialize` type.

Integers are delivered as `i64`, statuses as borrowed strings, bulk strings
as borrowed bytes, nil as unit (or `None`), and arrays as sequences.
Integers can additionally be deserialized as `bool` (0 or 1). A `Result`
receives `-error` replies as `Err`, and `+OK` can be deserialized as either
`Ok(())` or `Ok("OK")`. Error replies can't be deserialized as anything
other than the `Err` side of a `Result`.
*/

use lazy_format::lazy_format;
use serde::{de, forward_to_deserialize_any};

use crate::{error::Error, message::Message};

/// Deserialize a `T` from a decoded message. The value can borrow strings
/// and bytes from the message.
///
/// ```
/// use respire::{bind::from_message, Message};
///
/// let message = Message::from(vec![Message::from("alpha"), Message::from(2)]);
/// let (name, count): (&str, u8) = from_message(&message).expect("failed to deserialize");
///
/// assert_eq!(name, "alpha");
/// assert_eq!(count, 2);
/// ```
pub fn from_message<'de, T>(message: &'de Message) -> Result<T, Error>
where
    T: de::Deserialize<'de>,
{
    T::deserialize(MessageDeserializer::new(message))
}

/// A [`serde::Deserializer`] that reads from a borrowed [`Message`].
#[derive(Debug, Clone, Copy)]
pub struct MessageDeserializer<'de> {
    message: &'de Message,
}

impl<'de> MessageDeserializer<'de> {
    /// Create a deserializer reading from `message`.
    #[inline]
    #[must_use]
    pub fn new(message: &'de Message) -> Self {
        Self { message }
    }
}

impl<'de> de::Deserializer<'de> for MessageDeserializer<'de> {
    type Error = Error;

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match self.message {
            Message::Status(text) => visitor.visit_borrowed_str(text),
            Message::Error(text) => Err(de::Error::custom(lazy_format!(
                "received an error reply ({text:?}) where a value was expected"
            ))),
            &Message::Integer(value) => visitor.visit_i64(value),
            Message::Bulk(Some(bytes)) => visitor.visit_borrowed_bytes(bytes),
            Message::Bulk(None) | Message::Array(None) => visitor.visit_unit(),
            Message::Array(Some(items)) => {
                let mut seq = SeqAccess {
                    items: items.iter(),
                };
                let value = visitor.visit_seq(&mut seq)?;

                match seq.items.len() {
                    0 => Ok(value),
                    remaining => Err(de::Error::custom(lazy_format!(
                        "{remaining} of {} array elements were left over",
                        items.len()
                    ))),
                }
            }
        }
    }

    #[inline]
    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match *self.message {
            Message::Integer(0) => visitor.visit_bool(false),
            Message::Integer(1) => visitor.visit_bool(true),
            _ => self.deserialize_any(visitor),
        }
    }

    #[inline]
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match self.message.is_nil() {
            true => visitor.visit_none(),
            false => visitor.visit_some(self),
        }
    }

    #[inline]
    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match (name, variants, self.message) {
            ("Result", ["Ok", "Err"] | ["Err", "Ok"], message) => match message {
                // "+OK\r\n" can be deserialized to either Result::Ok("OK") or
                // Result::Ok(())
                Message::Status(text) if text == "OK" => {
                    visitor.visit_enum(ResultAccess::new(PlainOk))
                }
                Message::Error(text) => visitor.visit_enum(ResultAccess::new(ErrReply(text))),
                _ => visitor.visit_enum(ResultAccess::new(OkValue(self))),
            },

            // Unit variants, by name
            (_, _, Message::Status(text)) => {
                visitor.visit_enum(de::value::BorrowedStrDeserializer::new(text))
            }
            (_, _, Message::Bulk(Some(bytes))) => match std::str::from_utf8(bytes) {
                Ok(text) => visitor.visit_enum(de::value::BorrowedStrDeserializer::new(text)),
                Err(_) => Err(Error::InvalidUtf8),
            },

            (_, _, message) => Err(de::Error::custom(lazy_format!(
                "expected a variant name, found {}",
                message.kind()
            ))),
        }
    }

    #[inline]
    fn is_human_readable(&self) -> bool {
        false
    }
}

struct SeqAccess<'de> {
    items: std::slice::Iter<'de, Message>,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'de> {
    type Error = Error;

    #[inline]
    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        self.items
            .next()
            .map(|item| seed.deserialize(MessageDeserializer::new(item)))
            .transpose()
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// The two ways a `Result` can be read out of a message: which variant it
/// is, and how to deserialize that variant's payload.
trait ResultPattern<'de> {
    const VARIANT: &'static str;

    fn value<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>;
}

struct ResultAccess<T> {
    pattern: T,
}

impl<T> ResultAccess<T> {
    #[inline]
    #[must_use]
    fn new(pattern: T) -> Self {
        Self { pattern }
    }
}

impl<'de, T: ResultPattern<'de>> de::EnumAccess<'de> for ResultAccess<T> {
    type Error = Error;
    type Variant = Self;

    #[inline]
    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(de::value::BorrowedStrDeserializer::new(T::VARIANT))
            .map(|value| (value, self))
    }
}

impl<'de, T: ResultPattern<'de>> de::VariantAccess<'de> for ResultAccess<T> {
    type Error = Error;

    #[inline]
    fn newtype_variant_seed<S>(self, seed: S) -> Result<S::Value, Self::Error>
    where
        S: de::DeserializeSeed<'de>,
    {
        self.pattern.value(seed)
    }

    #[inline]
    fn unit_variant(self) -> Result<(), Self::Error> {
        Err(de::Error::invalid_type(
            de::Unexpected::NewtypeVariant,
            &"unit variant",
        ))
    }

    #[inline]
    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(de::Error::invalid_type(
            de::Unexpected::NewtypeVariant,
            &visitor,
        ))
    }

    #[inline]
    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(de::Error::invalid_type(
            de::Unexpected::NewtypeVariant,
            &visitor,
        ))
    }
}

/// `+OK`, which is `Ok(())` as well as `Ok("OK")`.
struct PlainOk;

impl<'de> ResultPattern<'de> for PlainOk {
    const VARIANT: &'static str = "Ok";

    #[inline]
    fn value<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }
}

impl<'de> de::Deserializer<'de> for PlainOk {
    type Error = Error;

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        option unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any enum
    }

    #[inline]
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str("OK")
    }

    #[inline]
    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(b"OK")
    }

    #[inline]
    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    #[inline]
    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Any other message, which is the payload of `Ok`.
struct OkValue<'de>(MessageDeserializer<'de>);

impl<'de> ResultPattern<'de> for OkValue<'de> {
    const VARIANT: &'static str = "Ok";

    #[inline]
    fn value<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.0)
    }
}

/// `-error`, with the error text as the payload of `Err`.
struct ErrReply<'de>(&'de str);

impl<'de> ResultPattern<'de> for ErrReply<'de> {
    const VARIANT: &'static str = "Err";

    #[inline]
    fn value<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(de::value::BorrowedStrDeserializer::new(self.0))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use cool_asserts::assert_matches;
    use serde::Deserialize;

    use super::*;

    fn bulk(data: &'static [u8]) -> Message {
        Message::Bulk(Some(Bytes::from_static(data)))
    }

    fn array(items: Vec<Message>) -> Message {
        Message::Array(Some(items))
    }

    #[test]
    fn status_as_str() {
        let message = Message::from("hello");
        assert_eq!(from_message::<&str>(&message).unwrap(), "hello");
    }

    #[test]
    fn bulk_as_bytes() {
        let message = bulk(b"\x00\r\n");
        let bytes: &[u8] = from_message::<&serde_bytes::Bytes>(&message).unwrap();
        assert_eq!(bytes, b"\x00\r\n");
    }

    #[test]
    fn bulk_as_string() {
        let message = bulk(b"text");
        assert_eq!(from_message::<String>(&message).unwrap(), "text");
    }

    #[test]
    fn integers() {
        assert_eq!(from_message::<i64>(&Message::from(-7)).unwrap(), -7);
        assert_eq!(from_message::<u8>(&Message::from(255)).unwrap(), 255);
        assert_matches!(from_message::<u8>(&Message::from(256)), Err(Error::Custom(_)));
    }

    #[test]
    fn bools() {
        assert!(from_message::<bool>(&Message::from(1)).unwrap());
        assert!(!from_message::<bool>(&Message::from(0)).unwrap());
        assert!(from_message::<bool>(&Message::from(2)).is_err());
    }

    #[test]
    fn options() {
        assert_eq!(from_message::<Option<i64>>(&Message::nil()).unwrap(), None);
        assert_eq!(from_message::<Option<i64>>(&Message::nil_array()).unwrap(), None);
        assert_eq!(from_message::<Option<i64>>(&Message::from(3)).unwrap(), Some(3));
    }

    #[test]
    fn nested_arrays() {
        let message = array(vec![
            array(vec![Message::from(1), Message::from(2)]),
            array(vec![]),
        ]);

        assert_eq!(
            from_message::<Vec<Vec<i32>>>(&message).unwrap(),
            [vec![1, 2], vec![]]
        );
    }

    #[test]
    fn tuple_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Entry<'a>(&'a str, i64, Option<String>);

        let message = array(vec![bulk(b"key"), Message::from(10), Message::nil()]);

        assert_eq!(
            from_message::<Entry>(&message).unwrap(),
            Entry("key", 10, None)
        );
    }

    #[test]
    fn too_short_tuple() {
        let message = array(vec![Message::from(1)]);
        assert!(from_message::<(i64, i64)>(&message).is_err());
    }

    #[test]
    fn too_long_tuple() {
        let message = array(vec![Message::from(1), Message::from(2), Message::from(3)]);
        assert!(from_message::<(i64, i64)>(&message).is_err());
    }

    #[test]
    fn plain_ok() {
        let message = Message::from("OK");

        assert_eq!(
            from_message::<Result<(), String>>(&message).unwrap(),
            Ok(())
        );
        assert_eq!(
            from_message::<Result<&str, String>>(&message).unwrap(),
            Ok("OK")
        );
    }

    #[test]
    fn ok_value() {
        let message = Message::from(10);
        assert_eq!(
            from_message::<Result<i64, String>>(&message).unwrap(),
            Ok(10)
        );
    }

    #[test]
    fn error_reply() {
        let message = Message::Error("ERR unknown command".to_owned());

        assert_eq!(
            from_message::<Result<i64, String>>(&message).unwrap(),
            Err("ERR unknown command".to_owned())
        );
        assert_matches!(from_message::<i64>(&message), Err(Error::Custom(_)));
    }

    #[test]
    fn results_in_an_array() {
        let message = array(vec![
            Message::from("OK"),
            Message::Error("WRONGTYPE".to_owned()),
        ]);

        assert_eq!(
            from_message::<Vec<Result<(), String>>>(&message).unwrap(),
            [Ok(()), Err("WRONGTYPE".to_owned())]
        );
    }

    #[test]
    fn unit_variants() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Type {
            String,
            List,
        }

        assert!(from_message::<Type>(&Message::from("list")).is_err());
        assert_eq!(from_message::<Type>(&Message::from("List")).unwrap(), Type::List);
        assert_eq!(from_message::<Type>(&bulk(b"String")).unwrap(), Type::String);
    }

    #[test]
    fn newtype_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Count(u32);

        assert_eq!(from_message::<Count>(&Message::from(4)).unwrap(), Count(4));
    }
}
