//! The outcome of one decode step.

use core::fmt;

use crate::iter::CollectionItemIterator;
use crate::{CodecError, CollectionType, ElementType, ErrorCode};

/// Application-defined extension type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionType(pub i8);

impl ExtensionType {
    /// The raw type code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i8 {
        self.0
    }

    /// Returns true for codes reserved by the MessagePack specification (negative values).
    #[inline]
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 < 0
    }
}

/// Declared element count of a collection header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionLength {
    /// Exact count: array elements or map entries. Zero is a valid empty collection.
    Known(usize),
    /// The format cannot express a count; discover the end via the iterator only.
    Unknown,
}

impl CollectionLength {
    /// The count, if known.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Option<usize> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }

    /// Signed form used by tracing tools: the count, or `-1` when unknown.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Known(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::Unknown => -1,
        }
    }
}

/// Payload bytes of a scalar or sequence item.
///
/// Sequences borrow the decoder input. Numeric scalars are carried inline in native byte
/// order because the wire form is big-endian (or folded into the header byte) and cannot be
/// viewed in place.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawBytes<'a>(Repr<'a>);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Repr<'a> {
    Borrowed(&'a [u8]),
    // `len` never exceeds 8.
    Inline { buf: [u8; 8], len: u8 },
}

impl<'a> RawBytes<'a> {
    /// A view into caller- or decoder-owned bytes.
    #[inline]
    #[must_use]
    pub const fn borrowed(bytes: &'a [u8]) -> Self {
        Self(Repr::Borrowed(bytes))
    }

    /// Copy up to eight value bytes inline; anything past the eighth is dropped.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn inline(src: &[u8]) -> Self {
        let n = src.len().min(8);
        let mut buf = [0u8; 8];
        buf[..n].copy_from_slice(&src[..n]);
        Self(Repr::Inline { buf, len: n as u8 })
    }

    /// The payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.0 {
            Repr::Borrowed(b) => b,
            Repr::Inline { buf, len } => &buf[..usize::from(*len)],
        }
    }

    /// The borrowed input view, if this payload is one.
    #[must_use]
    pub const fn as_borrowed(&self) -> Option<&'a [u8]> {
        match self.0 {
            Repr::Borrowed(b) => Some(b),
            Repr::Inline { .. } => None,
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [u8]> for RawBytes<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::borrowed(bytes)
    }
}

impl fmt::Debug for RawBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_bytes()).finish()
    }
}

/// Tag and payload of a numeric scalar, string, binary or trivia item.
///
/// Only [`DecodeItemResult::scalar_or_sequence`] builds one, so a numeric tag always comes with
/// a payload of its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarItem<'a> {
    element_type: ElementType,
    bytes: RawBytes<'a>,
}

impl<'a> ScalarItem<'a> {
    /// The item tag.
    #[inline]
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The payload.
    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> RawBytes<'a> {
        self.bytes
    }
}

/// An array or map header together with the handle that pulls its children.
///
/// Only [`DecodeItemResult::collection_header`] builds one.
#[derive(Debug, PartialEq, Eq)]
pub struct CollectionHeader {
    element_type: ElementType,
    items: CollectionItemIterator,
    length: CollectionLength,
}

impl CollectionHeader {
    /// [`ElementType::Array`] or [`ElementType::Map`].
    #[inline]
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Declared element count (map entries for maps).
    #[inline]
    #[must_use]
    pub const fn length(&self) -> CollectionLength {
        self.length
    }

    /// The child-item iterator.
    #[must_use]
    pub const fn items(&self) -> &CollectionItemIterator {
        &self.items
    }

    /// Take the child-item iterator.
    #[must_use]
    pub fn into_items(self) -> CollectionItemIterator {
        self.items
    }
}

/// One decoded item.
///
/// Only the payload that belongs to a tag is reachable from it. Borrowed payloads live no
/// longer than the input the decoder was constructed over.
#[derive(Debug, PartialEq)]
pub enum DecodeItemResult<'a> {
    /// No value.
    None,
    /// Null / nil.
    Null,
    /// Boolean true.
    True,
    /// Boolean false.
    False,
    /// A numeric scalar, string, binary or trivia run.
    Scalar(ScalarItem<'a>),
    /// An array or map header.
    Collection(CollectionHeader),
    /// An extension-type object.
    Extension {
        /// Application-defined type code.
        ext_type: ExtensionType,
        /// Extension body.
        body: &'a [u8],
    },
    /// The input ended before the item was complete.
    InsufficientInput,
}

impl Default for DecodeItemResult<'_> {
    fn default() -> Self {
        Self::None
    }
}

impl<'a> DecodeItemResult<'a> {
    /// A null item.
    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }

    /// A true item.
    #[must_use]
    pub const fn r#true() -> Self {
        Self::True
    }

    /// A false item.
    #[must_use]
    pub const fn r#false() -> Self {
        Self::False
    }

    /// A boolean item.
    #[must_use]
    pub const fn from_bool(v: bool) -> Self {
        if v {
            Self::True
        } else {
            Self::False
        }
    }

    /// A numeric scalar, string, binary or trivia item.
    ///
    /// Numeric payloads must be 4 bytes (`Int32`, `Single`) or 8 bytes (`Int64`, `UInt64`,
    /// `Double`) in native byte order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `element_type` is not a scalar or sequence kind, or if a
    /// numeric payload has the wrong width.
    pub fn scalar_or_sequence(
        element_type: ElementType,
        bytes: RawBytes<'a>,
    ) -> Result<Self, CodecError> {
        let width_ok = match element_type {
            ElementType::Int32 | ElementType::Single => bytes.len() == 4,
            ElementType::Int64 | ElementType::UInt64 | ElementType::Double => bytes.len() == 8,
            ElementType::String | ElementType::Binary => true,
            t if t.is_trivia() => true,
            _ => return Err(CodecError::invalid_argument()),
        };
        if !width_ok {
            return Err(CodecError::invalid_argument());
        }
        Ok(Self::Scalar(ScalarItem {
            element_type,
            bytes,
        }))
    }

    /// An array or map header.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `element_type` is not `Array` or `Map`, or if `items`
    /// iterates the other kind of collection.
    pub fn collection_header(
        element_type: ElementType,
        items: CollectionItemIterator,
        length: CollectionLength,
    ) -> Result<Self, CodecError> {
        if !element_type.is_collection()
            || CollectionType::of(element_type) != items.collection_type()
        {
            return Err(CodecError::invalid_argument());
        }
        Ok(Self::Collection(CollectionHeader {
            element_type,
            items,
            length,
        }))
    }

    /// An extension-type object.
    #[must_use]
    pub const fn extension_type_object(ext_type: ExtensionType, body: &'a [u8]) -> Self {
        Self::Extension { ext_type, body }
    }

    /// The recoverable insufficient-input outcome.
    #[must_use]
    pub const fn insufficient_input() -> Self {
        Self::InsufficientInput
    }

    /// The item tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::None => ElementType::None,
            Self::Null => ElementType::Null,
            Self::True => ElementType::True,
            Self::False => ElementType::False,
            Self::Scalar(s) => s.element_type,
            Self::Collection(c) => c.element_type,
            Self::Extension { .. } => ElementType::Extension,
            Self::InsufficientInput => ElementType::InsufficientInputError,
        }
    }

    /// Returns true unless the tag is `None`.
    #[inline]
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.element_type().has_value()
    }

    /// Returns true for error outcomes.
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.element_type().is_error()
    }

    /// Raw payload of a scalar or sequence item, or the body of an extension.
    #[must_use]
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Scalar(s) => Some(s.bytes.as_bytes()),
            Self::Extension { body, .. } => Some(*body),
            _ => None,
        }
    }

    /// Extension body; the same storage [`DecodeItemResult::raw_bytes`] exposes.
    #[must_use]
    pub const fn extension_body(&self) -> Option<&'a [u8]> {
        match self {
            Self::Extension { body, .. } => Some(*body),
            _ => None,
        }
    }

    /// Extension type code.
    #[must_use]
    pub const fn extension_type(&self) -> Option<ExtensionType> {
        match self {
            Self::Extension { ext_type, .. } => Some(*ext_type),
            _ => None,
        }
    }

    /// Declared collection length.
    #[must_use]
    pub const fn collection_length(&self) -> Option<CollectionLength> {
        match self {
            Self::Collection(c) => Some(c.length),
            _ => None,
        }
    }

    /// Take the child-item iterator out of a collection header.
    #[must_use]
    pub fn into_items(self) -> Option<CollectionItemIterator> {
        match self {
            Self::Collection(c) => Some(c.items),
            _ => None,
        }
    }

    /// Interpret an integer item as `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        let Self::Scalar(ScalarItem {
            element_type,
            bytes,
        }) = self
        else {
            return None;
        };
        let b = bytes.as_bytes();
        match element_type {
            ElementType::Int32 => Some(i64::from(i32::from_ne_bytes(b.try_into().ok()?))),
            ElementType::Int64 => Some(i64::from_ne_bytes(b.try_into().ok()?)),
            _ => None,
        }
    }

    /// Interpret a non-negative integer item as `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Scalar(ScalarItem {
                element_type: ElementType::UInt64,
                bytes,
            }) => Some(u64::from_ne_bytes(bytes.as_bytes().try_into().ok()?)),
            _ => self.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Interpret a float item as `f64` (binary32 widens exactly).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let Self::Scalar(ScalarItem {
            element_type,
            bytes,
        }) = self
        else {
            return None;
        };
        let b = bytes.as_bytes();
        match element_type {
            ElementType::Single => Some(f64::from(f32::from_ne_bytes(b.try_into().ok()?))),
            ElementType::Double => Some(f64::from_ne_bytes(b.try_into().ok()?)),
            _ => None,
        }
    }

    /// Interpret a boolean item.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            _ => None,
        }
    }

    /// Convert an outcome into a `Result`, mapping `InsufficientInput` to an error at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientInput` for the insufficient-input outcome.
    pub fn into_result(self, offset: usize) -> Result<Self, CodecError> {
        match self {
            Self::InsufficientInput => Err(CodecError::new(ErrorCode::InsufficientInput, offset)),
            other => Ok(other),
        }
    }
}
