use crate::CodecError;

#[cfg(feature = "alloc")]
use crate::alloc_util::try_reserve;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Forward-only reader over a byte slice.
///
/// Every read either succeeds completely or fails with `InsufficientInput` without moving.
/// Callers that compose several reads save [`Cursor::position`] and restore it on failure.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.data.len());
        self.pos = pos;
    }

    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn peek_u8(&self) -> Result<u8, CodecError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| CodecError::insufficient(self.pos))
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let off = self.pos;
        let end = self
            .pos
            .checked_add(n)
            .ok_or_else(|| CodecError::new(crate::ErrorCode::LengthOverflow, off))?;
        if end > self.data.len() {
            return Err(CodecError::insufficient(off));
        }
        let s = &self.data[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let s = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(s);
        Ok(out)
    }

    pub fn read_be_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }
}

#[inline]
pub fn len_to_usize(len: u64, off: usize) -> Result<usize, CodecError> {
    usize::try_from(len).map_err(|_| CodecError::new(crate::ErrorCode::LengthOverflow, off))
}

/// Pending child counts of the collections a skip is inside of.
///
/// Without `alloc` the inline capacity bounds the depth a skip can handle.
pub struct SmallStack<const N: usize> {
    inline: [usize; N],
    len: usize,
    #[cfg(feature = "alloc")]
    overflow: Vec<usize>,
}

impl<const N: usize> SmallStack<N> {
    pub const fn new() -> Self {
        Self {
            inline: [0; N],
            len: 0,
            #[cfg(feature = "alloc")]
            overflow: Vec::new(),
        }
    }

    pub fn push(&mut self, value: usize, off: usize) -> Result<(), CodecError> {
        #[cfg(feature = "alloc")]
        {
            if !self.overflow.is_empty() {
                try_reserve(&mut self.overflow, 1, off)?;
                self.overflow.push(value);
                return Ok(());
            }
        }

        if self.len < N {
            self.inline[self.len] = value;
            self.len += 1;
            return Ok(());
        }

        #[cfg(feature = "alloc")]
        {
            try_reserve(&mut self.overflow, 1, off)?;
            self.overflow.push(value);
            Ok(())
        }

        #[cfg(not(feature = "alloc"))]
        {
            Err(CodecError::new(crate::ErrorCode::DepthLimitExceeded, off))
        }
    }

    pub fn peek_mut(&mut self) -> Option<&mut usize> {
        #[cfg(feature = "alloc")]
        {
            if let Some(v) = self.overflow.last_mut() {
                return Some(v);
            }
        }
        if self.len == 0 {
            None
        } else {
            Some(&mut self.inline[self.len - 1])
        }
    }

    pub fn pop(&mut self) -> Option<usize> {
        #[cfg(feature = "alloc")]
        {
            if let Some(v) = self.overflow.pop() {
                return Some(v);
            }
        }
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(self.inline[self.len])
        }
    }
}
