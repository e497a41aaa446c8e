use crate::code;
use crate::iter::CollectionItemIterator;
use crate::result::RawBytes;
use crate::utf8;
use crate::wire::{len_to_usize, Cursor, SmallStack};
use crate::{
    CodecError, CollectionContext, CollectionLength, CollectionType, DecodeItemResult,
    DecodeLimits, ElementType, ErrorCode, ExtensionType,
};

#[cfg(feature = "alloc")]
const SKIP_INLINE: usize = 32;
#[cfg(not(feature = "alloc"))]
const SKIP_INLINE: usize = crate::limits::DEFAULT_MAX_DEPTH + 2;

#[derive(Debug, Clone, Copy)]
enum Int {
    Signed(i64),
    Unsigned(u64),
}

#[derive(Debug, Clone, Copy)]
enum Header<'a> {
    Nil,
    Bool(bool),
    Int(Int),
    F32(f32),
    F64(f64),
    Str(&'a [u8]),
    Bin(&'a [u8]),
    Array(usize),
    Map(usize),
    Ext(ExtensionType, &'a [u8]),
}

#[inline]
const fn mismatch(off: usize) -> CodecError {
    CodecError::new(ErrorCode::TypeMismatch, off)
}

#[inline]
const fn out_of_range(off: usize) -> CodecError {
    CodecError::new(ErrorCode::ValueOutOfRange, off)
}

const fn is_int(t: ElementType) -> bool {
    matches!(
        t,
        ElementType::Int32 | ElementType::Int64 | ElementType::UInt64
    )
}

/// Classify an integer by value and lay its payload out inline.
fn int_parts<'a>(v: Int) -> (ElementType, RawBytes<'a>) {
    match v {
        Int::Unsigned(u) => {
            if let Ok(i) = i32::try_from(u) {
                (ElementType::Int32, RawBytes::inline(&i.to_ne_bytes()))
            } else if let Ok(i) = i64::try_from(u) {
                (ElementType::Int64, RawBytes::inline(&i.to_ne_bytes()))
            } else {
                (ElementType::UInt64, RawBytes::inline(&u.to_ne_bytes()))
            }
        }
        Int::Signed(s) => match i32::try_from(s) {
            Ok(i) => (ElementType::Int32, RawBytes::inline(&i.to_ne_bytes())),
            Err(_) => (ElementType::Int64, RawBytes::inline(&s.to_ne_bytes())),
        },
    }
}

/// MessagePack decoder over a byte slice.
///
/// The decoder owns the [`CollectionContext`] of the decode it performs. Every call either
/// completes one logical step or fails without moving the position or the depth counter, so
/// a call that reports insufficient input can be repeated verbatim once more input exists
/// (see [`StreamBuffer`](crate::StreamBuffer)).
///
/// Borrowed payloads (strings, binaries, extension bodies) live as long as the input slice.
#[derive(Debug)]
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
    limits: DecodeLimits,
    ctx: CollectionContext,
}

impl<'a> Decoder<'a> {
    /// Construct a decoder over `bytes`.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if `bytes` exceeds the input limit and
    /// `InvalidArgument` if `limits.max_depth` is zero.
    pub fn new(bytes: &'a [u8], limits: DecodeLimits) -> Result<Self, CodecError> {
        if bytes.len() > limits.max_input_bytes {
            return Err(CodecError::new(ErrorCode::MessageLenLimitExceeded, 0));
        }
        let ctx = CollectionContext::from_limits(&limits)?;
        Ok(Self {
            cursor: Cursor::new(bytes),
            limits,
            ctx,
        })
    }

    /// Return the current byte offset in the input.
    #[must_use]
    #[inline]
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Number of unread input bytes.
    #[must_use]
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Returns true once every input byte has been consumed.
    #[must_use]
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.cursor.remaining() == 0
    }

    /// The limits this decoder enforces.
    #[must_use]
    pub const fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// The recursion budget of this decode.
    #[must_use]
    pub const fn context(&self) -> &CollectionContext {
        &self.ctx
    }

    pub(crate) fn rewind(&mut self, pos: usize) {
        self.cursor.set_position(pos);
    }

    pub(crate) fn leave_collection(&mut self) -> Result<(), CodecError> {
        self.ctx.decrement_depth().map(|_| ())
    }

    fn atomic<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        let start = self.cursor.position();
        let r = f(self);
        if r.is_err() {
            self.cursor.set_position(start);
        }
        r
    }

    fn check_len(len: usize, max: usize, err: ErrorCode, off: usize) -> Result<(), CodecError> {
        if len > max {
            codec_warn!(len, max, offset = off, code = ?err, "declared length rejected");
            return Err(CodecError::new(err, off));
        }
        Ok(())
    }

    fn read_len8(&mut self) -> Result<usize, CodecError> {
        Ok(usize::from(self.cursor.read_u8()?))
    }

    fn read_len16(&mut self) -> Result<usize, CodecError> {
        Ok(usize::from(self.cursor.read_be_u16()?))
    }

    fn read_len32(&mut self, off: usize) -> Result<usize, CodecError> {
        len_to_usize(u64::from(self.cursor.read_be_u32()?), off)
    }

    fn str_payload(&mut self, len: usize, off: usize) -> Result<Header<'a>, CodecError> {
        Self::check_len(len, self.limits.max_str_len, ErrorCode::StrLenLimitExceeded, off)?;
        Ok(Header::Str(self.cursor.read_exact(len)?))
    }

    fn bin_payload(&mut self, len: usize, off: usize) -> Result<Header<'a>, CodecError> {
        Self::check_len(len, self.limits.max_bin_len, ErrorCode::BinLenLimitExceeded, off)?;
        Ok(Header::Bin(self.cursor.read_exact(len)?))
    }

    fn ext_payload(&mut self, len: usize, off: usize) -> Result<Header<'a>, CodecError> {
        Self::check_len(len, self.limits.max_ext_len, ErrorCode::ExtLenLimitExceeded, off)?;
        let t = i8::from_be_bytes([self.cursor.read_u8()?]);
        Ok(Header::Ext(ExtensionType(t), self.cursor.read_exact(len)?))
    }

    fn array_len(&self, len: usize, off: usize) -> Result<Header<'a>, CodecError> {
        self.ctx.check_array_len(len, off)?;
        Ok(Header::Array(len))
    }

    fn map_len(&self, len: usize, off: usize) -> Result<Header<'a>, CodecError> {
        self.ctx.check_map_count(len, off)?;
        Ok(Header::Map(len))
    }

    /// Read one header plus any inline payload. Not atomic on its own.
    ///
    /// Running out of input is reported at the header offset, where a retry resumes.
    fn read_header(&mut self) -> Result<(Header<'a>, usize), CodecError> {
        let off = self.cursor.position();
        match self.read_header_at(off) {
            Ok(h) => Ok((h, off)),
            Err(err) if err.is_retryable() => Err(CodecError::insufficient(off)),
            Err(err) => Err(err),
        }
    }

    fn read_header_at(&mut self, off: usize) -> Result<Header<'a>, CodecError> {
        let b = self.cursor.read_u8()?;
        let h = match b {
            0x00..=code::POSITIVE_FIXINT_MAX => Header::Int(Int::Unsigned(u64::from(b))),
            code::NEGATIVE_FIXINT_MIN..=0xff => {
                Header::Int(Int::Signed(i64::from(i8::from_be_bytes([b]))))
            }
            code::FIXMAP..=code::FIXMAP_MAX => self.map_len(usize::from(b & 0x0f), off)?,
            code::FIXARRAY..=code::FIXARRAY_MAX => self.array_len(usize::from(b & 0x0f), off)?,
            code::FIXSTR..=code::FIXSTR_MAX => self.str_payload(usize::from(b & 0x1f), off)?,
            code::NIL => Header::Nil,
            code::NEVER_USED => return Err(CodecError::new(ErrorCode::InvalidFormatByte, off)),
            code::FALSE => Header::Bool(false),
            code::TRUE => Header::Bool(true),
            code::BIN8 => {
                let n = self.read_len8()?;
                self.bin_payload(n, off)?
            }
            code::BIN16 => {
                let n = self.read_len16()?;
                self.bin_payload(n, off)?
            }
            code::BIN32 => {
                let n = self.read_len32(off)?;
                self.bin_payload(n, off)?
            }
            code::EXT8 => {
                let n = self.read_len8()?;
                self.ext_payload(n, off)?
            }
            code::EXT16 => {
                let n = self.read_len16()?;
                self.ext_payload(n, off)?
            }
            code::EXT32 => {
                let n = self.read_len32(off)?;
                self.ext_payload(n, off)?
            }
            code::FLOAT32 => Header::F32(f32::from_bits(self.cursor.read_be_u32()?)),
            code::FLOAT64 => Header::F64(f64::from_bits(self.cursor.read_be_u64()?)),
            code::UINT8 => Header::Int(Int::Unsigned(u64::from(self.cursor.read_u8()?))),
            code::UINT16 => Header::Int(Int::Unsigned(u64::from(self.cursor.read_be_u16()?))),
            code::UINT32 => Header::Int(Int::Unsigned(u64::from(self.cursor.read_be_u32()?))),
            code::UINT64 => Header::Int(Int::Unsigned(self.cursor.read_be_u64()?)),
            code::INT8 => Header::Int(Int::Signed(i64::from(i8::from_be_bytes(
                self.cursor.read_array()?,
            )))),
            code::INT16 => Header::Int(Int::Signed(i64::from(i16::from_be_bytes(
                self.cursor.read_array()?,
            )))),
            code::INT32 => Header::Int(Int::Signed(i64::from(i32::from_be_bytes(
                self.cursor.read_array()?,
            )))),
            code::INT64 => Header::Int(Int::Signed(i64::from_be_bytes(self.cursor.read_array()?))),
            code::FIXEXT1 => self.ext_payload(1, off)?,
            code::FIXEXT2 => self.ext_payload(2, off)?,
            code::FIXEXT4 => self.ext_payload(4, off)?,
            code::FIXEXT8 => self.ext_payload(8, off)?,
            code::FIXEXT16 => self.ext_payload(16, off)?,
            code::STR8 => {
                let n = self.read_len8()?;
                self.str_payload(n, off)?
            }
            code::STR16 => {
                let n = self.read_len16()?;
                self.str_payload(n, off)?
            }
            code::STR32 => {
                let n = self.read_len32(off)?;
                self.str_payload(n, off)?
            }
            code::ARRAY16 => {
                let n = self.read_len16()?;
                self.array_len(n, off)?
            }
            code::ARRAY32 => {
                let n = self.read_len32(off)?;
                self.array_len(n, off)?
            }
            code::MAP16 => {
                let n = self.read_len16()?;
                self.map_len(n, off)?
            }
            code::MAP32 => {
                let n = self.read_len32(off)?;
                self.map_len(n, off)?
            }
        };
        Ok(h)
    }

    /// Fail with `TypeMismatch` (without consuming) unless the next header byte starts an
    /// item `accept` allows.
    fn expect_family(&self, accept: impl Fn(ElementType) -> bool) -> Result<(), CodecError> {
        let off = self.cursor.position();
        let b = self.cursor.peek_u8()?;
        if b == code::NEVER_USED {
            return Err(CodecError::new(ErrorCode::InvalidFormatByte, off));
        }
        if accept(code::element_type_of(b)) {
            Ok(())
        } else {
            Err(mismatch(off))
        }
    }

    /// Classify the next item without consuming it.
    ///
    /// Integers are classified by value, so this reads the integer body when the header
    /// alone is not decisive.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientInput` at end of input and `InvalidFormatByte` for 0xc1.
    pub fn peek_element_type(&mut self) -> Result<ElementType, CodecError> {
        let off = self.cursor.position();
        let b = self.cursor.peek_u8()?;
        match b {
            code::UINT32 | code::UINT64 | code::INT64 => {
                let start = self.cursor.position();
                let r = self.read_header();
                self.cursor.set_position(start);
                match r?.0 {
                    Header::Int(v) => Ok(int_parts(v).0),
                    _ => Err(mismatch(off)),
                }
            }
            code::NEVER_USED => Err(CodecError::new(ErrorCode::InvalidFormatByte, off)),
            _ => Ok(code::element_type_of(b)),
        }
    }

    /// Decode one item.
    ///
    /// Arrays and maps come back as headers; their children are pulled through the returned
    /// [`CollectionItemIterator`], which must be drained or [finished](CollectionItemIterator::finish)
    /// before the enclosing collection can advance. Entering a collection consumes one level of
    /// the depth budget until its iterator completes.
    ///
    /// Running out of input is reported as [`DecodeItemResult::InsufficientInput`] with nothing
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input, limit violations and depth overflow.
    pub fn read_item(&mut self) -> Result<DecodeItemResult<'a>, CodecError> {
        match self.read_item_strict() {
            Err(err) if err.is_retryable() => Ok(DecodeItemResult::insufficient_input()),
            other => other,
        }
    }

    /// Decode one item, reporting insufficient input as an error instead of an outcome.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientInput` when the item is incomplete, plus every error of
    /// [`Decoder::read_item`].
    pub fn read_item_strict(&mut self) -> Result<DecodeItemResult<'a>, CodecError> {
        let (h, off) = self.atomic(Self::read_header)?;
        let item = match h {
            Header::Nil => Ok(DecodeItemResult::null()),
            Header::Bool(v) => Ok(DecodeItemResult::from_bool(v)),
            Header::Int(v) => {
                let (element_type, bytes) = int_parts(v);
                DecodeItemResult::scalar_or_sequence(element_type, bytes)
            }
            Header::F32(v) => DecodeItemResult::scalar_or_sequence(
                ElementType::Single,
                RawBytes::inline(&v.to_ne_bytes()),
            ),
            Header::F64(v) => DecodeItemResult::scalar_or_sequence(
                ElementType::Double,
                RawBytes::inline(&v.to_ne_bytes()),
            ),
            Header::Str(s) => {
                DecodeItemResult::scalar_or_sequence(ElementType::String, RawBytes::borrowed(s))
            }
            Header::Bin(s) => {
                DecodeItemResult::scalar_or_sequence(ElementType::Binary, RawBytes::borrowed(s))
            }
            Header::Ext(t, body) => Ok(DecodeItemResult::extension_type_object(t, body)),
            Header::Array(n) => return self.enter(ElementType::Array, n, n, off),
            Header::Map(n) => {
                let Some(items) = n.checked_mul(2) else {
                    self.cursor.set_position(off);
                    return Err(CodecError::new(ErrorCode::LengthOverflow, off));
                };
                return self.enter(ElementType::Map, n, items, off);
            }
        };
        if item.is_err() {
            self.cursor.set_position(off);
        }
        item
    }

    fn enter(
        &mut self,
        element_type: ElementType,
        len: usize,
        items: usize,
        off: usize,
    ) -> Result<DecodeItemResult<'a>, CodecError> {
        let items = CollectionItemIterator::new(
            CollectionType::of(element_type),
            items,
            self.ctx.current_depth().saturating_add(1),
        );
        let header = DecodeItemResult::collection_header(
            element_type,
            items,
            CollectionLength::Known(len),
        )
        .and_then(|header| self.ctx.increment_depth(off).map(|_| header));
        if header.is_err() {
            self.cursor.set_position(off);
        }
        header
    }

    /// Skip exactly one value, including everything nested in it.
    ///
    /// Traversal is iterative; nesting is charged against the depth budget and released again
    /// as each level completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is incomplete, malformed, or nests too deeply. Nothing is
    /// consumed on error, and an incomplete value is reported at its own start.
    pub fn skip_value(&mut self) -> Result<(), CodecError> {
        let start = self.cursor.position();
        let base_depth = self.ctx.current_depth();
        let r = self.skip_value_inner().map_err(|err| {
            if err.is_retryable() {
                CodecError::insufficient(start)
            } else {
                err
            }
        });
        if r.is_err() {
            self.cursor.set_position(start);
            while self.ctx.current_depth() > base_depth {
                if self.ctx.decrement_depth().is_err() {
                    break;
                }
            }
        }
        r
    }

    fn skip_value_inner(&mut self) -> Result<(), CodecError> {
        let mut stack = SmallStack::<SKIP_INLINE>::new();
        let (h, off) = self.read_header()?;
        self.push_children(h, off, &mut stack)?;

        while let Some(remaining) = stack.peek_mut() {
            if *remaining == 0 {
                stack.pop();
                self.ctx.decrement_depth()?;
                continue;
            }
            *remaining -= 1;
            let (h, off) = self.read_header()?;
            self.push_children(h, off, &mut stack)?;
        }
        Ok(())
    }

    fn push_children(
        &mut self,
        h: Header<'a>,
        off: usize,
        stack: &mut SmallStack<SKIP_INLINE>,
    ) -> Result<(), CodecError> {
        let items = match h {
            Header::Array(n) => n,
            Header::Map(n) => n
                .checked_mul(2)
                .ok_or_else(|| CodecError::new(ErrorCode::LengthOverflow, off))?,
            _ => return Ok(()),
        };
        self.ctx.increment_depth(off)?;
        stack.push(items, off)
    }

    /// Return the encoded bytes of the next value and move past it.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::skip_value`].
    pub fn read_raw_value(&mut self) -> Result<&'a [u8], CodecError> {
        let start = self.cursor.position();
        self.skip_value()?;
        Ok(&self.cursor.data()[start..self.cursor.position()])
    }

    /// Decode nil.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the next item is not nil.
    pub fn read_nil(&mut self) -> Result<(), CodecError> {
        self.expect_family(|t| t == ElementType::Null)?;
        self.cursor.read_u8().map(|_| ())
    }

    /// Consume a nil if one is next.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientInput` at end of input.
    pub fn try_read_nil(&mut self) -> Result<bool, CodecError> {
        if self.cursor.peek_u8()? == code::NIL {
            self.cursor.read_u8()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Decode a boolean.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the next item is not a boolean.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        self.expect_family(|t| matches!(t, ElementType::True | ElementType::False))?;
        Ok(self.cursor.read_u8()? == code::TRUE)
    }

    fn read_int(&mut self) -> Result<(Int, usize), CodecError> {
        self.expect_family(is_int)?;
        self.atomic(|d| match d.read_header()? {
            (Header::Int(v), off) => Ok((v, off)),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode any integer that fits `i64`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-integers and `ValueOutOfRange` above `i64::MAX`.
    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        self.atomic(|d| match d.read_int()? {
            (Int::Signed(v), _) => Ok(v),
            (Int::Unsigned(v), off) => i64::try_from(v).map_err(|_| out_of_range(off)),
        })
    }

    /// Decode any integer that fits `i32`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-integers and `ValueOutOfRange` if the value does not fit.
    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        self.atomic(|d| {
            let off = d.position();
            let v = d.read_i64()?;
            i32::try_from(v).map_err(|_| out_of_range(off))
        })
    }

    /// Decode any non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-integers and `ValueOutOfRange` for negative values.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.atomic(|d| match d.read_int()? {
            (Int::Unsigned(v), _) => Ok(v),
            (Int::Signed(v), off) => u64::try_from(v).map_err(|_| out_of_range(off)),
        })
    }

    /// Decode any integer that fits `u32`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-integers and `ValueOutOfRange` if the value does not fit.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.atomic(|d| {
            let off = d.position();
            let v = d.read_u64()?;
            u32::try_from(v).map_err(|_| out_of_range(off))
        })
    }

    /// Decode a float32.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for anything but float32.
    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        self.expect_family(|t| t == ElementType::Single)?;
        self.atomic(|d| match d.read_header()? {
            (Header::F32(v), _) => Ok(v),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode a float32 or float64 as `f64`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-floats.
    pub fn read_f64(&mut self) -> Result<f64, CodecError> {
        self.expect_family(|t| matches!(t, ElementType::Single | ElementType::Double))?;
        self.atomic(|d| match d.read_header()? {
            (Header::F32(v), _) => Ok(f64::from(v)),
            (Header::F64(v), _) => Ok(v),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode a string's raw encoded bytes without validating them.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-strings.
    pub fn read_str_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        self.expect_family(|t| t == ElementType::String)?;
        self.atomic(|d| match d.read_header()? {
            (Header::Str(s), _) => Ok(s),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-strings and `Utf8Invalid`, positioned at the first bad
    /// byte, for invalid text.
    pub fn read_str(&mut self) -> Result<&'a str, CodecError> {
        self.atomic(|d| {
            let bytes = d.read_str_bytes()?;
            let body = d.position() - bytes.len();
            utf8::check(bytes)
                .map_err(|valid| CodecError::new(ErrorCode::Utf8Invalid, body + valid))
        })
    }

    /// Decode a binary blob.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-binaries.
    pub fn read_bin(&mut self) -> Result<&'a [u8], CodecError> {
        self.expect_family(|t| t == ElementType::Binary)?;
        self.atomic(|d| match d.read_header()? {
            (Header::Bin(s), _) => Ok(s),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode an array header and return its length.
    ///
    /// The elements follow; this does not touch the depth budget.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-arrays and `ArrayLenLimitExceeded` for oversized headers.
    pub fn read_array_header(&mut self) -> Result<usize, CodecError> {
        self.expect_family(|t| t == ElementType::Array)?;
        self.atomic(|d| match d.read_header()? {
            (Header::Array(n), _) => Ok(n),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode a map header and return its entry count.
    ///
    /// The entries follow; this does not touch the depth budget.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-maps and `MapLenLimitExceeded` for oversized headers.
    pub fn read_map_header(&mut self) -> Result<usize, CodecError> {
        self.expect_family(|t| t == ElementType::Map)?;
        self.atomic(|d| match d.read_header()? {
            (Header::Map(n), _) => Ok(n),
            (_, off) => Err(mismatch(off)),
        })
    }

    /// Decode an extension-type object.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for non-extensions.
    pub fn read_ext(&mut self) -> Result<(ExtensionType, &'a [u8]), CodecError> {
        self.expect_family(|t| t == ElementType::Extension)?;
        self.atomic(|d| match d.read_header()? {
            (Header::Ext(t, body), _) => Ok((t, body)),
            (_, off) => Err(mismatch(off)),
        })
    }
}
