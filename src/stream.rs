use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::{CodecError, DecodeLimits, Decoder, ErrorCode};

/// Accumulates input that arrives in chunks and decodes it once enough is buffered.
///
/// Each [`StreamBuffer::decode`] call runs a fresh [`Decoder`] over the unread bytes. Input is
/// consumed only when the closure succeeds, so a step that fails with `InsufficientInput` can
/// be retried unchanged after the next [`StreamBuffer::push`]. Splitting the input at any
/// byte boundary yields the same items as decoding it whole.
#[derive(Debug, Clone)]
pub struct StreamBuffer {
    buf: Vec<u8>,
    start: usize,
    limits: DecodeLimits,
}

impl StreamBuffer {
    /// Construct an empty buffer.
    #[must_use]
    pub const fn new(limits: DecodeLimits) -> Self {
        Self {
            buf: Vec::new(),
            start: 0,
            limits,
        }
    }

    /// Unread bytes.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    /// Returns true if no unread bytes remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a chunk of input.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if the unread bytes would exceed
    /// `limits.max_input_bytes`; the chunk is not appended.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), CodecError> {
        let total = self
            .len()
            .checked_add(chunk.len())
            .ok_or_else(|| CodecError::new(ErrorCode::LengthOverflow, self.len()))?;
        if total > self.limits.max_input_bytes {
            codec_warn!(
                buffered = self.len(),
                chunk = chunk.len(),
                max = self.limits.max_input_bytes,
                "stream input exceeds limit"
            );
            return Err(CodecError::new(
                ErrorCode::MessageLenLimitExceeded,
                self.len(),
            ));
        }
        self.compact();
        let offset = self.buf.len();
        try_reserve(&mut self.buf, chunk.len(), offset)?;
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Run one decode step over the unread bytes.
    ///
    /// On success the bytes the decoder moved past are consumed. On error nothing is.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns; `InsufficientInput` means more input is needed.
    pub fn decode<T>(
        &mut self,
        f: impl for<'d> FnOnce(&mut Decoder<'d>) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        let mut dec = Decoder::new(&self.buf[self.start..], self.limits)?;
        let out = f(&mut dec)?;
        self.start += dec.position();
        Ok(out)
    }

    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        if self.start == self.buf.len() {
            self.buf.clear();
        } else if self.start >= self.buf.len() / 2 {
            codec_trace!(
                consumed = self.start,
                kept = self.buf.len() - self.start,
                "compacting stream buffer"
            );
            self.buf.drain(..self.start);
        } else {
            return;
        }
        self.start = 0;
    }
}
