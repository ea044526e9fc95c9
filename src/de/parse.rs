//! Decimal number parsing for RESP headers and integer payloads.

use crate::error::{Error, Result};

#[inline]
#[must_use]
const fn ascii_to_digit(b: u8) -> Option<i64> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as i64),
        _ => None,
    }
}

/// Parse a base-10 signed 64 bit integer, with an optional leading `-` or
/// `+`. Anything else, including an empty payload, a lone sign, or a value
/// that overflows, is rejected.
pub fn parse_number(payload: &[u8]) -> Result<i64> {
    let (digits, positive) = match payload.split_first() {
        Some((&b'-', tail)) => (tail, false),
        Some((&b'+', tail)) => (tail, true),
        Some(_) => (payload, true),
        None => return Err(Error::InvalidInput("empty integer")),
    };

    if digits.is_empty() {
        return Err(Error::InvalidInput("integer has a sign but no digits"));
    }

    digits
        .iter()
        .copied()
        .try_fold(0i64, move |accum, b| {
            let digit = ascii_to_digit(b)?;
            let digit = if positive { digit } else { -digit };
            let accum = accum.checked_mul(10)?;
            accum.checked_add(digit)
        })
        .ok_or(Error::InvalidInput("malformed decimal integer"))
}

/// A bulk string or array length from a header: `None` for any negative
/// length (nil), otherwise the length.
pub fn parse_length(payload: &[u8]) -> Result<Option<usize>> {
    match parse_number(payload)? {
        length if length < 0 => Ok(None),
        length => usize::try_from(length)
            .map(Some)
            .map_err(|_| Error::InvalidInput("length does not fit in memory")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;

    macro_rules! test_cases {
        ($($name:ident: $input:expr, $expected:pat,)*) => {$(
            #[test]
            fn $name() {
                assert_matches!($input, $expected)
            }
        )*};
    }

    mod parse_number {
        use super::*;

        macro_rules! number_test_cases {
            ($($name:ident: $input:literal == $expected:pat,)*) => {
                test_cases!{$(
                    $name: parse_number($input), $expected,
                )*}
            };
        }

        number_test_cases! {
            zero: b"0" == Ok(0),
            positive: b"123" == Ok(123),
            explicit_positive: b"+123" == Ok(123),
            negative: b"-123" == Ok(-123),
            leading_zeros: b"007" == Ok(7),
            max: b"9223372036854775807" == Ok(i64::MAX),
            min: b"-9223372036854775808" == Ok(i64::MIN),
            overflow: b"9223372036854775808" == Err(Error::InvalidInput(_)),
            letters: b"12a3" == Err(Error::InvalidInput(_)),
            decimal_point: b"-12.3" == Err(Error::InvalidInput(_)),
            empty: b"" == Err(Error::InvalidInput(_)),
            lone_sign: b"-" == Err(Error::InvalidInput(_)),
            whitespace: b" 1" == Err(Error::InvalidInput(_)),
        }
    }

    mod parse_length {
        use super::*;

        test_cases! {
            length: parse_length(b"5"), Ok(Some(5)),
            empty_length: parse_length(b"0"), Ok(Some(0)),
            nil: parse_length(b"-1"), Ok(None),
            weird_nil: parse_length(b"-001"), Ok(None),
            bad: parse_length(b"x"), Err(Error::InvalidInput(_)),
        }
    }
}
