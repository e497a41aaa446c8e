//! Tags classifying decoded items.

/// Classification of one decoded item.
///
/// Numeric codes are stable so that trace output and debugging tools agree across versions.
/// Trivia kinds exist for self-describing textual formats that interleave insignificant input;
/// binary formats never produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum ElementType {
    /// No value.
    #[default]
    None = 0,
    /// Signed integer that fits 32 bits.
    Int32 = 1,
    /// Signed integer that fits 64 bits but not 32.
    Int64 = 2,
    /// Unsigned integer above `i64::MAX`.
    UInt64 = 3,
    /// IEEE-754 binary32.
    Single = 4,
    /// IEEE-754 binary64.
    Double = 5,
    /// Boolean true.
    True = 6,
    /// Boolean false.
    False = 7,
    /// Null / nil.
    Null = 8,
    /// Array header.
    Array = 0x11,
    /// Map header.
    Map = 0x12,
    /// Encoded string bytes.
    String = 0x21,
    /// Raw binary bytes.
    Binary = 0x22,
    /// Extension-type object.
    Extension = 0x31,
    /// Insignificant whitespace.
    Whitespace = 0x41,
    /// Comment.
    Comment = 0x42,
    /// Any other trivia.
    OtherTrivia = 0x4f,
    /// The input ended before the item was complete.
    InsufficientInputError = -1,
}

impl ElementType {
    /// The stable numeric code of this tag.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Look up a tag by its numeric code.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            1 => Self::Int32,
            2 => Self::Int64,
            3 => Self::UInt64,
            4 => Self::Single,
            5 => Self::Double,
            6 => Self::True,
            7 => Self::False,
            8 => Self::Null,
            0x11 => Self::Array,
            0x12 => Self::Map,
            0x21 => Self::String,
            0x22 => Self::Binary,
            0x31 => Self::Extension,
            0x41 => Self::Whitespace,
            0x42 => Self::Comment,
            0x4f => Self::OtherTrivia,
            -1 => Self::InsufficientInputError,
            _ => return None,
        })
    }

    /// Returns true for every tag except [`ElementType::None`].
    #[inline]
    #[must_use]
    pub const fn has_value(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns true for negative (error) tags.
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.code() < 0
    }

    /// Numeric scalars whose payload is native-endian value bytes.
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::UInt64 | Self::Single | Self::Double
        )
    }

    /// Array or map.
    #[inline]
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::Array | Self::Map)
    }

    /// String or binary.
    #[inline]
    #[must_use]
    pub const fn is_sequence(self) -> bool {
        matches!(self, Self::String | Self::Binary)
    }

    /// Whitespace, comment or other trivia.
    #[inline]
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment | Self::OtherTrivia)
    }
}

/// Lightweight shape tag for a value: absent, null, array or map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionType {
    /// Not a collection.
    #[default]
    None,
    /// A null in collection position.
    Null,
    /// An array.
    Array,
    /// A map.
    Map,
}

impl CollectionType {
    /// Shape of an item with the given element type.
    #[must_use]
    pub const fn of(element: ElementType) -> Self {
        match element {
            ElementType::Null => Self::Null,
            ElementType::Array => Self::Array,
            ElementType::Map => Self::Map,
            _ => Self::None,
        }
    }

    /// Returns true for arrays and maps.
    #[inline]
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::Array | Self::Map)
    }
}

impl From<ElementType> for CollectionType {
    fn from(element: ElementType) -> Self {
        Self::of(element)
    }
}
