use std::io;

use bytes::BytesMut;

use crate::error::{Error, Result};

/// The [`Output`] trait is the destination for bytes written by the
/// [`Serializer`][super::Serializer]. Every header, payload, and array
/// element is handed to it as soon as it's computed, so an output backed by
/// a socket sees the first bytes of a large array before the last ones have
/// been produced.
pub trait Output {
    /// Hint that there are upcoming writes totalling this number of
    /// bytes.
    fn reserve(&mut self, count: usize);

    /// Append bytes to the output.
    fn write_bytes(&mut self, b: &[u8]) -> Result<()>;
}

impl<T: Output + ?Sized> Output for &mut T {
    #[inline]
    fn reserve(&mut self, count: usize) {
        T::reserve(*self, count)
    }

    #[inline]
    fn write_bytes(&mut self, b: &[u8]) -> Result<()> {
        T::write_bytes(*self, b)
    }
}

impl Output for Vec<u8> {
    #[inline]
    fn reserve(&mut self, count: usize) {
        self.reserve(count)
    }

    #[inline]
    fn write_bytes(&mut self, b: &[u8]) -> Result<()> {
        self.extend_from_slice(b);
        Ok(())
    }
}

impl Output for BytesMut {
    #[inline]
    fn reserve(&mut self, count: usize) {
        self.reserve(count)
    }

    #[inline]
    fn write_bytes(&mut self, b: &[u8]) -> Result<()> {
        self.extend_from_slice(b);
        Ok(())
    }
}

/// [`Output`] adapter type for serializing to an [`io::Write`] object, such
/// as a file or socket. Writes are passed straight through; wrap the writer
/// in an [`io::BufWriter`] to batch them.
#[derive(Debug, Clone, Copy, Default)]
pub struct IoWrite<T>(pub T);

impl<T: io::Write> Output for IoWrite<T> {
    #[inline]
    fn reserve(&mut self, _count: usize) {}

    #[inline]
    fn write_bytes(&mut self, b: &[u8]) -> Result<()> {
        self.0.write_all(b).map_err(Error::Io)
    }
}
