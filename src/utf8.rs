//! UTF-8 checks for string payloads.

/// Borrow `bytes` as text.
///
/// On failure returns the length of the longest valid prefix, so callers can point at the
/// first bad byte.
#[inline]
pub fn check(bytes: &[u8]) -> Result<&str, usize> {
    #[cfg(feature = "simdutf8")]
    {
        // The fast path only says yes or no; rerun the compat checker for the position.
        simdutf8::basic::from_utf8(bytes).or_else(|_| {
            simdutf8::compat::from_utf8(bytes).map_err(|e| e.valid_up_to())
        })
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).map_err(|e| e.valid_up_to())
    }
}
