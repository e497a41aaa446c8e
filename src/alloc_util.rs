//! Fallible growth for scratch vectors.

use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{CodecError, ErrorCode};

/// Make room for `additional` more elements, reporting failures at `offset`.
///
/// A size past `isize::MAX` bytes is `LengthOverflow`; an allocator refusal is
/// `AllocationFailed`.
#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), CodecError> {
    if v.capacity() - v.len() >= additional {
        return Ok(());
    }
    let overflow = || CodecError::new(ErrorCode::LengthOverflow, offset);
    let wanted = v.len().checked_add(additional).ok_or_else(overflow)?;
    Layout::array::<T>(wanted).map_err(|_| overflow())?;
    v.try_reserve(additional)
        .map_err(|_| CodecError::new(ErrorCode::AllocationFailed, offset))
}

/// An empty vector able to hold `cap` elements.
#[inline]
pub fn try_with_capacity<T>(cap: usize, offset: usize) -> Result<Vec<T>, CodecError> {
    let mut v = Vec::new();
    try_reserve(&mut v, cap, offset)?;
    Ok(v)
}
