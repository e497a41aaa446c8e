//! Appendable byte sinks for encoders.

use crate::{CodecError, ErrorCode};

#[cfg(feature = "alloc")]
use crate::alloc_util::try_reserve;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// An appendable byte sink.
///
/// A failed write leaves previously written bytes intact; how much of a failed write landed
/// is implementation-defined, so encoders treat any error as terminal for the value.
pub trait Sink {
    /// Append `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot grow.
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError>;

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot grow.
    fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        self.write(&[byte])
    }

    /// Number of bytes written so far.
    fn position(&self) -> usize;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        (**self).write(bytes)
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        (**self).write_u8(byte)
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}

#[cfg(feature = "alloc")]
impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let offset = self.len();
        try_reserve(self, bytes.len(), offset)?;
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        if self.len() == self.capacity() {
            let offset = self.len();
            try_reserve(self, 1, offset)?;
        }
        self.push(byte);
        Ok(())
    }

    fn position(&self) -> usize {
        self.len()
    }
}

#[cfg(feature = "bytes")]
impl Sink for bytes::BytesMut {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn position(&self) -> usize {
        self.len()
    }
}

/// A sink over a fixed caller-provided buffer.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Wrap `buf`; writing starts at its beginning.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The bytes written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Unused capacity.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl Sink for SliceSink<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        if bytes.len() > self.remaining() {
            return Err(CodecError::new(ErrorCode::BufferLimitExceeded, self.pos));
        }
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    fn position(&self) -> usize {
        self.pos
    }
}
