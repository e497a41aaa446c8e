use core::fmt;

/// The high-level class of an error.
///
/// Callers branch on the kind rather than on individual codes:
/// - **InsufficientInput**: more bytes are needed; the failed call consumed nothing and may be retried.
/// - **Limit**: a configured structural ceiling was hit (depth, declared lengths, buffer sizes).
/// - **Malformed**: the input bytes do not form a valid item.
/// - **Mismatch**: the input is well formed but is not the requested type or does not fit it.
/// - **Unsupported**: the format cannot represent the requested value.
/// - **Argument**: a caller passed an invalid configuration value or factory argument.
/// - **Cancelled**: a cooperative cancellation signal was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recoverable: not enough input yet.
    InsufficientInput,
    /// Structural or resource limit exceeded.
    Limit,
    /// Malformed input.
    Malformed,
    /// Type mismatch between the wire and the requested value.
    Mismatch,
    /// The format does not support the requested type.
    Unsupported,
    /// Invalid argument supplied by the caller.
    Argument,
    /// Cancellation observed.
    Cancelled,
}

/// A structured error code identifying why an encode or decode step failed.
///
/// This enum is intentionally stable and string-free to support `no_std` and to remain hot-path friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The input ends before the current item is complete.
    InsufficientInput,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// A depth decrement was attempted at depth zero.
    DepthUnderflow,
    /// Declared array length exceeds limits.
    ArrayLenLimitExceeded,
    /// Declared map entry count exceeds limits.
    MapLenLimitExceeded,
    /// Declared string length exceeds limits.
    StrLenLimitExceeded,
    /// Declared binary length exceeds limits.
    BinLenLimitExceeded,
    /// Declared extension body length exceeds limits.
    ExtLenLimitExceeded,
    /// Input (or buffered stream data) exceeds the configured input limit.
    MessageLenLimitExceeded,
    /// A pooled output buffer would grow beyond its configured ceiling.
    BufferLimitExceeded,

    /// The reserved format byte (0xc1) was encountered.
    InvalidFormatByte,
    /// Arithmetic overflow while computing a length or offset.
    LengthOverflow,
    /// Invalid UTF-8 in a string payload.
    Utf8Invalid,
    /// A parent collection was advanced while a child collection was still open.
    CollectionNotFinished,

    /// The item on the wire is not of the requested type.
    TypeMismatch,
    /// The item is of the requested type but its value does not fit the target.
    ValueOutOfRange,

    /// The format does not support the requested type.
    NotSupported,

    /// A configuration value or factory argument is invalid.
    InvalidArgument,
    /// Memory allocation failed.
    AllocationFailed,

    /// Cancellation was requested while processing.
    Cancelled,
}

impl ErrorCode {
    /// Classify this code.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InsufficientInput => ErrorKind::InsufficientInput,
            Self::DepthLimitExceeded
            | Self::DepthUnderflow
            | Self::ArrayLenLimitExceeded
            | Self::MapLenLimitExceeded
            | Self::StrLenLimitExceeded
            | Self::BinLenLimitExceeded
            | Self::ExtLenLimitExceeded
            | Self::MessageLenLimitExceeded
            | Self::BufferLimitExceeded => ErrorKind::Limit,
            Self::InvalidFormatByte
            | Self::LengthOverflow
            | Self::Utf8Invalid
            | Self::CollectionNotFinished => ErrorKind::Malformed,
            Self::TypeMismatch | Self::ValueOutOfRange => ErrorKind::Mismatch,
            Self::NotSupported => ErrorKind::Unsupported,
            Self::InvalidArgument | Self::AllocationFailed => ErrorKind::Argument,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// A codec error with a stable code and a byte offset.
///
/// For decode errors `offset` is the input position where the failing item starts, so an
/// `InsufficientInput` offset is where a retry resumes. `Utf8Invalid` is the exception: it
/// points at the first invalid byte of the string body. For encode and configuration errors
/// it is the sink position, or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl CodecError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }

    /// Construct an insufficient-input error at `offset`.
    #[inline]
    #[must_use]
    pub const fn insufficient(offset: usize) -> Self {
        Self::new(ErrorCode::InsufficientInput, offset)
    }

    /// Construct an invalid-argument error.
    #[inline]
    #[must_use]
    pub const fn invalid_argument() -> Self {
        Self::new(ErrorCode::InvalidArgument, 0)
    }

    /// The error class.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        self.code.kind()
    }

    /// Returns true iff supplying more input and repeating the call may succeed.
    #[inline]
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self.code, ErrorCode::InsufficientInput)
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::InsufficientInput => "insufficient input",

            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::DepthUnderflow => "nesting depth underflow",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::StrLenLimitExceeded => "string length exceeds decode limits",
            ErrorCode::BinLenLimitExceeded => "binary length exceeds decode limits",
            ErrorCode::ExtLenLimitExceeded => "extension length exceeds decode limits",
            ErrorCode::MessageLenLimitExceeded => "input length exceeds decode limits",
            ErrorCode::BufferLimitExceeded => "buffer length exceeds configured maximum",

            ErrorCode::InvalidFormatByte => "reserved format byte",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::Utf8Invalid => "string must be valid UTF-8",
            ErrorCode::CollectionNotFinished => "nested collection not finished",

            ErrorCode::TypeMismatch => "unexpected item type",
            ErrorCode::ValueOutOfRange => "value out of range for requested type",

            ErrorCode::NotSupported => "type not supported by this format",

            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::AllocationFailed => "allocation failed",

            ErrorCode::Cancelled => "operation cancelled",
        };

        match self.kind() {
            ErrorKind::Unsupported | ErrorKind::Argument | ErrorKind::Cancelled => {
                write!(f, "codec error: {msg}")
            }
            _ => write!(f, "codec error at {}: {msg}", self.offset),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}
