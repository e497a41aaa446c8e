//! Rentable scratch buffers and the pooled encode session built on them.

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::alloc_util::{try_reserve, try_with_capacity};
use crate::{
    Cancellation, CancellationGate, CodecError, ErrorCode, FormatEncoder, FormatEncoderOptions,
    Sink,
};

/// A source of reusable buffers.
///
/// Implementations must tolerate concurrent `rent`/`give_back` from many threads.
pub trait BufferPool<T>: Send + Sync {
    /// Rent an empty buffer with capacity for at least `min_capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` or `LengthOverflow` if no such buffer can be produced.
    fn rent(&self, min_capacity: usize) -> Result<Vec<T>, CodecError>;

    /// Return a buffer previously rented from this pool.
    fn give_back(&self, buf: Vec<T>);
}

/// A pool that allocates on every rent and frees on every return.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapPool;

impl<T: Send> BufferPool<T> for HeapPool {
    fn rent(&self, min_capacity: usize) -> Result<Vec<T>, CodecError> {
        try_with_capacity(min_capacity, 0)
    }

    fn give_back(&self, _buf: Vec<T>) {}
}

/// A thread-safe pool retaining up to a fixed number of returned buffers.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct SharedArrayPool<T> {
    free: parking_lot::Mutex<Vec<Vec<T>>>,
    max_retained: usize,
}

#[cfg(feature = "std")]
impl<T> SharedArrayPool<T> {
    /// Default number of retained buffers.
    pub const DEFAULT_MAX_RETAINED: usize = 16;

    /// A pool retaining at most `max_retained` idle buffers.
    #[must_use]
    pub const fn new(max_retained: usize) -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            max_retained,
        }
    }

    /// Number of idle buffers currently held.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

#[cfg(feature = "std")]
impl<T> Default for SharedArrayPool<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETAINED)
    }
}

#[cfg(feature = "std")]
impl<T: Send> BufferPool<T> for SharedArrayPool<T> {
    fn rent(&self, min_capacity: usize) -> Result<Vec<T>, CodecError> {
        let reused = {
            let mut free = self.free.lock();
            let hit = free.iter().position(|b| b.capacity() >= min_capacity);
            hit.map(|i| free.swap_remove(i))
        };
        if let Some(buf) = reused {
            codec_trace!(capacity = buf.capacity(), "reusing pooled buffer");
            return Ok(buf);
        }
        codec_trace!(min_capacity, "allocating pooled buffer");
        try_with_capacity(min_capacity, 0)
    }

    fn give_back(&self, mut buf: Vec<T>) {
        if buf.capacity() == 0 {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            codec_trace!(capacity = buf.capacity(), "buffer returned to pool");
            free.push(buf);
        }
    }
}

/// A rented buffer that goes back to its pool when dropped.
///
/// With `clears_buffer` set the whole allocation is overwritten with `T::default()` and handed
/// back at full length; pools empty what they keep.
pub struct Rented<'p, T: Copy + Default> {
    buf: Vec<T>,
    pool: &'p dyn BufferPool<T>,
    clears_buffer: bool,
}

impl<'p, T: Copy + Default> Rented<'p, T> {
    /// Rent a buffer with capacity for at least `min_capacity` elements.
    ///
    /// # Errors
    ///
    /// Propagates the pool's allocation error.
    pub fn rent(
        pool: &'p dyn BufferPool<T>,
        min_capacity: usize,
        clears_buffer: bool,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            buf: pool.rent(min_capacity)?,
            pool,
            clears_buffer,
        })
    }

    /// Detach the buffer from the pool. It will not be returned or cleared.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<T> {
        core::mem::take(&mut self.buf)
    }
}

impl<T: Copy + Default> Deref for Rented<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.buf
    }
}

impl<T: Copy + Default> DerefMut for Rented<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buf
    }
}

impl<T: Copy + Default> Drop for Rented<'_, T> {
    fn drop(&mut self) {
        let mut buf = core::mem::take(&mut self.buf);
        if self.clears_buffer {
            let cap = buf.capacity();
            buf.clear();
            buf.resize(cap, T::default());
        }
        self.pool.give_back(buf);
    }
}

impl<T: Copy + Default + core::fmt::Debug> core::fmt::Debug for Rented<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rented")
            .field("buf", &self.buf)
            .field("clears_buffer", &self.clears_buffer)
            .finish_non_exhaustive()
    }
}

const INITIAL_SINK_CAPACITY: usize = 256;

/// A [`Sink`] over a pooled byte buffer.
///
/// Growth beyond `max_byte_buffer_length` fails with `BufferLimitExceeded`. The cancellation
/// signal is polled each time another `cancellation_support_threshold` bytes have been
/// written.
pub struct PooledSink<'p, C: Cancellation + ?Sized> {
    buf: Rented<'p, u8>,
    max_len: usize,
    gate: CancellationGate,
    cancel: &'p C,
}

impl<'p, C: Cancellation + ?Sized> PooledSink<'p, C> {
    /// Rent a sink buffer according to `options`.
    ///
    /// # Errors
    ///
    /// Propagates the pool's allocation error.
    pub fn new(options: &'p FormatEncoderOptions, cancel: &'p C) -> Result<Self, CodecError> {
        let max_len = options.max_byte_buffer_length();
        Ok(Self {
            buf: Rented::rent(
                options.byte_pool(),
                INITIAL_SINK_CAPACITY.min(max_len),
                options.clears_buffer(),
            )?,
            max_len,
            gate: CancellationGate::new(options.cancellation_support_threshold())?,
            cancel,
        })
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Copy the written bytes into an owned vector; the pooled buffer stays with the sink.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the copy cannot be allocated.
    pub fn to_vec(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = try_with_capacity(self.buf.len(), 0)?;
        out.extend_from_slice(&self.buf);
        Ok(out)
    }
}

impl<C: Cancellation + ?Sized> Sink for PooledSink<'_, C> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let pos = self.buf.len();
        let end = pos
            .checked_add(bytes.len())
            .ok_or_else(|| CodecError::new(ErrorCode::LengthOverflow, pos))?;
        if end > self.max_len {
            codec_debug!(
                len = end,
                max = self.max_len,
                "pooled buffer ceiling reached"
            );
            return Err(CodecError::new(ErrorCode::BufferLimitExceeded, pos));
        }
        self.gate.advance(bytes.len(), self.cancel, pos)?;
        try_reserve(&mut *self.buf, bytes.len(), pos)?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn position(&self) -> usize {
        self.buf.len()
    }
}

/// Run one encode session against a pooled buffer and return the encoded bytes.
///
/// The pooled buffer is returned to `options`' byte pool on every exit path.
///
/// # Errors
///
/// Returns the first error from `f`, including `BufferLimitExceeded` and `Cancelled`
/// raised by the sink.
///
/// ```
/// use packcore::{encode_pooled, FormatEncoder, FormatEncoderOptions, MsgPackEncoder, NeverCancel};
///
/// let options = FormatEncoderOptions::default();
/// let bytes = encode_pooled(&MsgPackEncoder, &options, &NeverCancel, |enc, out| {
///     enc.write_array_header(out, 2)?;
///     enc.write_i32(out, 1)?;
///     enc.write_opt_bool(out, None)
/// })
/// .unwrap();
/// assert_eq!(bytes, [0x92, 0x01, 0xc0]);
/// ```
pub fn encode_pooled<E, C, F>(
    encoder: &E,
    options: &FormatEncoderOptions,
    cancel: &C,
    f: F,
) -> Result<Vec<u8>, CodecError>
where
    E: FormatEncoder,
    C: Cancellation + ?Sized,
    F: FnOnce(&E, &mut PooledSink<'_, C>) -> Result<(), CodecError>,
{
    let mut sink = PooledSink::new(options, cancel)?;
    f(encoder, &mut sink)?;
    sink.to_vec()
}
