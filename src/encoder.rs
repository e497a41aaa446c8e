//! The primitive encode surface every concrete format implements.

use crate::{CodecError, ErrorCode, ExtensionType, FormatFeatures, Sink};

#[inline]
fn not_supported<S: Sink + ?Sized>(out: &S) -> CodecError {
    CodecError::new(ErrorCode::NotSupported, out.position())
}

/// Scalar encode primitives for one wire format.
///
/// Each format picks its most compact representation per value. Sequence, collection and
/// extension writers default to `NotSupported` so a format only overrides what it can
/// represent. Nullable writers are provided on top of the required primitives.
pub trait FormatEncoder {
    /// Capabilities of this format.
    fn features(&self) -> FormatFeatures;

    /// Encode null.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_nil<S: Sink + ?Sized>(&self, out: &mut S) -> Result<(), CodecError>;

    /// Encode a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_bool<S: Sink + ?Sized>(&self, out: &mut S, v: bool) -> Result<(), CodecError>;

    /// Encode an `i32`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_i32<S: Sink + ?Sized>(&self, out: &mut S, v: i32) -> Result<(), CodecError>;

    /// Encode an `i64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_i64<S: Sink + ?Sized>(&self, out: &mut S, v: i64) -> Result<(), CodecError>;

    /// Encode a `u32`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_u32<S: Sink + ?Sized>(&self, out: &mut S, v: u32) -> Result<(), CodecError>;

    /// Encode a `u64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_u64<S: Sink + ?Sized>(&self, out: &mut S, v: u64) -> Result<(), CodecError>;

    /// Encode an `f32`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_f32<S: Sink + ?Sized>(&self, out: &mut S, v: f32) -> Result<(), CodecError>;

    /// Encode an `f64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_f64<S: Sink + ?Sized>(&self, out: &mut S, v: f64) -> Result<(), CodecError>;

    /// Encode a string.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` unless the format overrides [`FormatEncoder::write_str_bytes`].
    fn write_str<S: Sink + ?Sized>(&self, out: &mut S, v: &str) -> Result<(), CodecError> {
        self.write_str_bytes(out, v.as_bytes())
    }

    /// Encode already UTF-8 encoded string bytes.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` by default.
    fn write_str_bytes<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        utf8: &[u8],
    ) -> Result<(), CodecError> {
        let _ = utf8;
        Err(not_supported(out))
    }

    /// Encode a binary blob.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` by default.
    fn write_bin<S: Sink + ?Sized>(&self, out: &mut S, v: &[u8]) -> Result<(), CodecError> {
        let _ = v;
        Err(not_supported(out))
    }

    /// Encode an array header for `len` elements.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` by default.
    fn write_array_header<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        len: usize,
    ) -> Result<(), CodecError> {
        let _ = len;
        Err(not_supported(out))
    }

    /// Encode a map header for `len` entries.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` by default.
    fn write_map_header<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        len: usize,
    ) -> Result<(), CodecError> {
        let _ = len;
        Err(not_supported(out))
    }

    /// Encode an extension-type object.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` by default.
    fn write_ext<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        ext_type: ExtensionType,
        body: &[u8],
    ) -> Result<(), CodecError> {
        let _ = (ext_type, body);
        Err(not_supported(out))
    }

    /// Encode any [`EncodeScalar`] value, including `Option`s of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_value<S: Sink + ?Sized, T: EncodeScalar>(
        &self,
        out: &mut S,
        v: T,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional boolean; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_bool<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<bool>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional `i32`; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_i32<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<i32>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional `i64`; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_i64<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<i64>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional `u32`; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_u32<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<u32>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional `u64`; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_u64<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<u64>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional `f32`; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_f32<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<f32>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }

    /// Encode an optional `f64`; `None` encodes as null.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn write_opt_f64<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        v: Option<f64>,
    ) -> Result<(), CodecError> {
        v.encode_to(self, out)
    }
}

/// A value that maps onto exactly one encode primitive.
///
/// `Option<T>` is implemented once here for every scalar: `None` routes to
/// [`FormatEncoder::write_nil`] and `Some` to the scalar's primitive.
pub trait EncodeScalar {
    /// Encode `self` with `enc` into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn encode_to<E: FormatEncoder + ?Sized, S: Sink + ?Sized>(
        self,
        enc: &E,
        out: &mut S,
    ) -> Result<(), CodecError>;
}

macro_rules! encode_scalar {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl EncodeScalar for $ty {
                #[inline]
                fn encode_to<E: FormatEncoder + ?Sized, S: Sink + ?Sized>(
                    self,
                    enc: &E,
                    out: &mut S,
                ) -> Result<(), CodecError> {
                    enc.$method(out, self)
                }
            }
        )*
    };
}

encode_scalar! {
    bool => write_bool,
    i32 => write_i32,
    i64 => write_i64,
    u32 => write_u32,
    u64 => write_u64,
    f32 => write_f32,
    f64 => write_f64,
}

impl EncodeScalar for &str {
    #[inline]
    fn encode_to<E: FormatEncoder + ?Sized, S: Sink + ?Sized>(
        self,
        enc: &E,
        out: &mut S,
    ) -> Result<(), CodecError> {
        enc.write_str(out, self)
    }
}

impl<T: EncodeScalar> EncodeScalar for Option<T> {
    #[inline]
    fn encode_to<E: FormatEncoder + ?Sized, S: Sink + ?Sized>(
        self,
        enc: &E,
        out: &mut S,
    ) -> Result<(), CodecError> {
        match self {
            Some(v) => v.encode_to(enc, out),
            None => enc.write_nil(out),
        }
    }
}
