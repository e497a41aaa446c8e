use crate::{CodecError, DecodeLimits, ErrorCode};

/// Recursion budget for one top-level decode.
///
/// The depth is an explicit counter driven by the decoder, not the native call stack, so
/// iterative traversals of hostile input stay bounded. `0 <= current_depth() <= max_depth()`
/// holds at every observable point: a failed transition leaves the counter untouched.
///
/// The length ceilings are consulted before a declared collection length from the wire is
/// trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionContext {
    max_array_length: usize,
    max_map_count: usize,
    max_depth: usize,
    current_depth: usize,
}

impl CollectionContext {
    /// Construct a context at depth zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `max_depth` is zero.
    pub const fn new(
        max_array_length: usize,
        max_map_count: usize,
        max_depth: usize,
    ) -> Result<Self, CodecError> {
        if max_depth == 0 {
            return Err(CodecError::invalid_argument());
        }
        Ok(Self {
            max_array_length,
            max_map_count,
            max_depth,
            current_depth: 0,
        })
    }

    /// Construct a context from decode limits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `limits.max_depth` is zero.
    pub const fn from_limits(limits: &DecodeLimits) -> Result<Self, CodecError> {
        Self::new(limits.max_array_len, limits.max_map_len, limits.max_depth)
    }

    /// Maximum array length accepted from the wire.
    #[inline]
    #[must_use]
    pub const fn max_array_length(&self) -> usize {
        self.max_array_length
    }

    /// Maximum map entry count accepted from the wire.
    #[inline]
    #[must_use]
    pub const fn max_map_count(&self) -> usize {
        self.max_map_count
    }

    /// Maximum nesting depth.
    #[inline]
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current nesting depth.
    #[inline]
    #[must_use]
    pub const fn current_depth(&self) -> usize {
        self.current_depth
    }

    /// Enter a collection whose header starts at `position`.
    ///
    /// Returns the depth before the increment.
    ///
    /// # Errors
    ///
    /// Returns `DepthLimitExceeded` at `position` if the context is already at `max_depth`.
    pub fn increment_depth(&mut self, position: usize) -> Result<usize, CodecError> {
        if self.current_depth == self.max_depth {
            codec_warn!(
                position,
                max_depth = self.max_depth,
                "collection nesting exceeds depth limit"
            );
            return Err(CodecError::new(ErrorCode::DepthLimitExceeded, position));
        }
        let prev = self.current_depth;
        self.current_depth += 1;
        Ok(prev)
    }

    /// Leave the innermost collection.
    ///
    /// Returns the depth before the decrement.
    ///
    /// # Errors
    ///
    /// Returns `DepthUnderflow` if the context is at depth zero.
    pub fn decrement_depth(&mut self) -> Result<usize, CodecError> {
        if self.current_depth == 0 {
            return Err(CodecError::new(ErrorCode::DepthUnderflow, 0));
        }
        let prev = self.current_depth;
        self.current_depth -= 1;
        Ok(prev)
    }

    /// Check a declared array length against the configured ceiling.
    ///
    /// # Errors
    ///
    /// Returns `ArrayLenLimitExceeded` at `position`.
    pub fn check_array_len(&self, len: usize, position: usize) -> Result<(), CodecError> {
        if len > self.max_array_length {
            codec_warn!(len, max = self.max_array_length, position, "array length rejected");
            return Err(CodecError::new(ErrorCode::ArrayLenLimitExceeded, position));
        }
        Ok(())
    }

    /// Check a declared map entry count against the configured ceiling.
    ///
    /// # Errors
    ///
    /// Returns `MapLenLimitExceeded` at `position`.
    pub fn check_map_count(&self, count: usize, position: usize) -> Result<(), CodecError> {
        if count > self.max_map_count {
            codec_warn!(count, max = self.max_map_count, position, "map count rejected");
            return Err(CodecError::new(ErrorCode::MapLenLimitExceeded, position));
        }
        Ok(())
    }
}
