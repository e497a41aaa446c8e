/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum container length limit for arrays and maps.
///
/// This is a safety limit; adjust explicitly for your deployment.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 20;

/// Default maximum input, string, binary and extension length.
pub const DEFAULT_MAX_BLOB_LEN: usize = 64 << 20;

/// Decode-time resource limits.
///
/// Limits are checked against declared lengths before any payload is trusted, so an absurd
/// header is rejected without allocating or iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeLimits {
    /// Maximum input length in bytes handed to one decoder (or buffered by a stream).
    pub max_input_bytes: usize,
    /// Maximum nesting depth. Must be at least 1.
    pub max_depth: usize,
    /// Maximum array length.
    pub max_array_len: usize,
    /// Maximum map length (entries).
    pub max_map_len: usize,
    /// Maximum string length in encoded bytes.
    pub max_str_len: usize,
    /// Maximum binary length.
    pub max_bin_len: usize,
    /// Maximum extension body length.
    pub max_ext_len: usize,
}

impl DecodeLimits {
    /// Construct conservative limits derived from a maximum message size.
    ///
    /// The defaults are:
    /// - `max_input_bytes`, `max_str_len`, `max_bin_len`, `max_ext_len` = `max_message_bytes`
    /// - `max_array_len` and `max_map_len` are capped by `DEFAULT_MAX_CONTAINER_LEN`
    /// - `max_depth = DEFAULT_MAX_DEPTH`
    #[must_use]
    pub fn for_bytes(max_message_bytes: usize) -> Self {
        let max_container_len = max_message_bytes.min(DEFAULT_MAX_CONTAINER_LEN);
        Self {
            max_input_bytes: max_message_bytes,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: max_container_len,
            max_map_len: max_container_len,
            max_str_len: max_message_bytes,
            max_bin_len: max_message_bytes,
            max_ext_len: max_message_bytes,
        }
    }

    /// Return a copy with a different depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::for_bytes(DEFAULT_MAX_BLOB_LEN)
    }
}
