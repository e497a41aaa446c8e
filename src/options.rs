use alloc::sync::Arc;
use core::fmt;

use crate::{BufferPool, CodecError, HeapPool};

/// Default byte count between cancellation checks (128 MiB).
pub const DEFAULT_CANCELLATION_SUPPORT_THRESHOLD: usize = 128 * 1024 * 1024;
/// Default ceiling for pooled byte buffers (2 MiB).
pub const DEFAULT_MAX_BYTE_BUFFER_LENGTH: usize = 2 * 1024 * 1024;
/// Default ceiling for pooled UTF-16 buffers, in code units (2 Mi).
pub const DEFAULT_MAX_CHAR_BUFFER_LENGTH: usize = 2 * 1024 * 1024;

/// Smallest accepted cancellation threshold.
pub const MIN_CANCELLATION_SUPPORT_THRESHOLD: usize = 1;
/// Smallest accepted byte buffer ceiling.
pub const MIN_MAX_BYTE_BUFFER_LENGTH: usize = 4;
/// Smallest accepted char buffer ceiling.
pub const MIN_MAX_CHAR_BUFFER_LENGTH: usize = 2;

fn heap_bytes() -> Arc<dyn BufferPool<u8>> {
    Arc::new(HeapPool)
}

fn heap_chars() -> Arc<dyn BufferPool<u16>> {
    Arc::new(HeapPool)
}

fn at_least(value: usize, min: usize) -> Result<usize, CodecError> {
    if value < min {
        return Err(CodecError::invalid_argument());
    }
    Ok(value)
}

/// Immutable encoder configuration.
///
/// Cloning is cheap; pools are shared.
#[derive(Clone)]
pub struct FormatEncoderOptions {
    byte_pool: Arc<dyn BufferPool<u8>>,
    char_pool: Arc<dyn BufferPool<u16>>,
    cancellation_support_threshold: usize,
    max_byte_buffer_length: usize,
    max_char_buffer_length: usize,
    clears_buffer: bool,
}

impl FormatEncoderOptions {
    /// Start a builder at the defaults.
    #[must_use]
    pub fn builder() -> FormatEncoderOptionsBuilder {
        FormatEncoderOptionsBuilder::new()
    }

    /// Start a builder from this snapshot.
    #[must_use]
    pub fn to_builder(&self) -> FormatEncoderOptionsBuilder {
        FormatEncoderOptionsBuilder {
            options: self.clone(),
        }
    }

    /// Pool for byte scratch buffers.
    #[must_use]
    pub fn byte_pool(&self) -> &dyn BufferPool<u8> {
        &*self.byte_pool
    }

    /// Pool for UTF-16 scratch buffers.
    #[must_use]
    pub fn char_pool(&self) -> &dyn BufferPool<u16> {
        &*self.char_pool
    }

    /// Bytes processed between polls of the cancellation signal.
    #[must_use]
    pub const fn cancellation_support_threshold(&self) -> usize {
        self.cancellation_support_threshold
    }

    /// Ceiling for a pooled byte buffer.
    #[must_use]
    pub const fn max_byte_buffer_length(&self) -> usize {
        self.max_byte_buffer_length
    }

    /// Ceiling for a pooled UTF-16 buffer, in code units.
    #[must_use]
    pub const fn max_char_buffer_length(&self) -> usize {
        self.max_char_buffer_length
    }

    /// Whether rented buffers are zeroed before they go back to their pool.
    #[must_use]
    pub const fn clears_buffer(&self) -> bool {
        self.clears_buffer
    }
}

impl Default for FormatEncoderOptions {
    fn default() -> Self {
        Self {
            byte_pool: heap_bytes(),
            char_pool: heap_chars(),
            cancellation_support_threshold: DEFAULT_CANCELLATION_SUPPORT_THRESHOLD,
            max_byte_buffer_length: DEFAULT_MAX_BYTE_BUFFER_LENGTH,
            max_char_buffer_length: DEFAULT_MAX_CHAR_BUFFER_LENGTH,
            clears_buffer: false,
        }
    }
}

impl fmt::Debug for FormatEncoderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatEncoderOptions")
            .field(
                "cancellation_support_threshold",
                &self.cancellation_support_threshold,
            )
            .field("max_byte_buffer_length", &self.max_byte_buffer_length)
            .field("max_char_buffer_length", &self.max_char_buffer_length)
            .field("clears_buffer", &self.clears_buffer)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FormatEncoderOptions`].
///
/// Numeric setters reject values below their documented minimum with `InvalidArgument` and
/// leave the builder unchanged. Each `reset_*` restores the default.
///
/// ```
/// use packcore::FormatEncoderOptions;
///
/// let options = FormatEncoderOptions::builder()
///     .max_byte_buffer_length(64 * 1024)?
///     .clears_buffer(true)
///     .build();
/// assert_eq!(options.max_byte_buffer_length(), 64 * 1024);
/// assert!(FormatEncoderOptions::builder().max_byte_buffer_length(3).is_err());
/// # Ok::<(), packcore::CodecError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct FormatEncoderOptionsBuilder {
    options: FormatEncoderOptions,
}

impl FormatEncoderOptionsBuilder {
    /// A builder at the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `pool` for byte scratch buffers.
    pub fn byte_pool(&mut self, pool: Arc<dyn BufferPool<u8>>) -> &mut Self {
        self.options.byte_pool = pool;
        self
    }

    /// Restore the unpooled heap allocator for bytes.
    pub fn reset_byte_pool(&mut self) -> &mut Self {
        self.byte_pool(heap_bytes())
    }

    /// Use `pool` for UTF-16 scratch buffers.
    pub fn char_pool(&mut self, pool: Arc<dyn BufferPool<u16>>) -> &mut Self {
        self.options.char_pool = pool;
        self
    }

    /// Restore the unpooled heap allocator for UTF-16 units.
    pub fn reset_char_pool(&mut self) -> &mut Self {
        self.char_pool(heap_chars())
    }

    /// Set the number of bytes between cancellation checks.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `value` is below [`MIN_CANCELLATION_SUPPORT_THRESHOLD`].
    pub fn cancellation_support_threshold(&mut self, value: usize) -> Result<&mut Self, CodecError> {
        self.options.cancellation_support_threshold =
            at_least(value, MIN_CANCELLATION_SUPPORT_THRESHOLD)?;
        Ok(self)
    }

    /// Restore [`DEFAULT_CANCELLATION_SUPPORT_THRESHOLD`].
    pub fn reset_cancellation_support_threshold(&mut self) -> &mut Self {
        self.options.cancellation_support_threshold = DEFAULT_CANCELLATION_SUPPORT_THRESHOLD;
        self
    }

    /// Set the byte buffer ceiling.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `value` is below [`MIN_MAX_BYTE_BUFFER_LENGTH`].
    pub fn max_byte_buffer_length(&mut self, value: usize) -> Result<&mut Self, CodecError> {
        self.options.max_byte_buffer_length = at_least(value, MIN_MAX_BYTE_BUFFER_LENGTH)?;
        Ok(self)
    }

    /// Restore [`DEFAULT_MAX_BYTE_BUFFER_LENGTH`].
    pub fn reset_max_byte_buffer_length(&mut self) -> &mut Self {
        self.options.max_byte_buffer_length = DEFAULT_MAX_BYTE_BUFFER_LENGTH;
        self
    }

    /// Set the UTF-16 buffer ceiling.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `value` is below [`MIN_MAX_CHAR_BUFFER_LENGTH`].
    pub fn max_char_buffer_length(&mut self, value: usize) -> Result<&mut Self, CodecError> {
        self.options.max_char_buffer_length = at_least(value, MIN_MAX_CHAR_BUFFER_LENGTH)?;
        Ok(self)
    }

    /// Restore [`DEFAULT_MAX_CHAR_BUFFER_LENGTH`].
    pub fn reset_max_char_buffer_length(&mut self) -> &mut Self {
        self.options.max_char_buffer_length = DEFAULT_MAX_CHAR_BUFFER_LENGTH;
        self
    }

    /// Set whether rented buffers are zeroed on return.
    pub fn clears_buffer(&mut self, value: bool) -> &mut Self {
        self.options.clears_buffer = value;
        self
    }

    /// Restore the default (`false`).
    pub fn reset_clears_buffer(&mut self) -> &mut Self {
        self.clears_buffer(false)
    }

    /// Snapshot the configuration.
    #[must_use]
    pub fn build(&self) -> FormatEncoderOptions {
        self.options.clone()
    }
}
