use crate::code;
use crate::{CodecError, ErrorCode, ExtensionType, FormatEncoder, FormatFeatures, Sink};

fn err_at<S: Sink + ?Sized>(sink: &S, code: ErrorCode) -> CodecError {
    CodecError::new(code, sink.position())
}

fn encode_uint<S: Sink + ?Sized>(sink: &mut S, v: u64) -> Result<(), CodecError> {
    if v <= u64::from(code::POSITIVE_FIXINT_MAX) {
        #[allow(clippy::cast_possible_truncation)]
        return sink.write_u8(v as u8);
    }
    if let Ok(v8) = u8::try_from(v) {
        return sink.write(&[code::UINT8, v8]);
    }
    if let Ok(v16) = u16::try_from(v) {
        let [a, b] = v16.to_be_bytes();
        return sink.write(&[code::UINT16, a, b]);
    }
    if let Ok(v32) = u32::try_from(v) {
        let mut buf = [0u8; 5];
        buf[0] = code::UINT32;
        buf[1..].copy_from_slice(&v32.to_be_bytes());
        return sink.write(&buf);
    }
    let mut buf = [0u8; 9];
    buf[0] = code::UINT64;
    buf[1..].copy_from_slice(&v.to_be_bytes());
    sink.write(&buf)
}

fn encode_int<S: Sink + ?Sized>(sink: &mut S, v: i64) -> Result<(), CodecError> {
    if let Ok(u) = u64::try_from(v) {
        return encode_uint(sink, u);
    }
    if v >= code::NEGATIVE_FIXINT_VALUE_MIN {
        return sink.write_u8(v.to_be_bytes()[7]);
    }
    if let Ok(v8) = i8::try_from(v) {
        return sink.write(&[code::INT8, v8.to_be_bytes()[0]]);
    }
    if let Ok(v16) = i16::try_from(v) {
        let [a, b] = v16.to_be_bytes();
        return sink.write(&[code::INT16, a, b]);
    }
    if let Ok(v32) = i32::try_from(v) {
        let mut buf = [0u8; 5];
        buf[0] = code::INT32;
        buf[1..].copy_from_slice(&v32.to_be_bytes());
        return sink.write(&buf);
    }
    let mut buf = [0u8; 9];
    buf[0] = code::INT64;
    buf[1..].copy_from_slice(&v.to_be_bytes());
    sink.write(&buf)
}

/// Length header tiers for one family: the inline `fix` base byte and its largest inline
/// length, then the 8/16/32-bit forms. `None` means the family has no such tier.
struct LenHeader {
    fix: Option<(u8, usize)>,
    len8: Option<u8>,
    len16: u8,
    len32: u8,
}

const STR_HEADER: LenHeader = LenHeader {
    fix: Some((code::FIXSTR, code::FIXSTR_LEN_MAX)),
    len8: Some(code::STR8),
    len16: code::STR16,
    len32: code::STR32,
};

const BIN_HEADER: LenHeader = LenHeader {
    fix: None,
    len8: Some(code::BIN8),
    len16: code::BIN16,
    len32: code::BIN32,
};

const ARRAY_HEADER: LenHeader = LenHeader {
    fix: Some((code::FIXARRAY, code::FIXCOLLECTION_LEN_MAX)),
    len8: None,
    len16: code::ARRAY16,
    len32: code::ARRAY32,
};

const MAP_HEADER: LenHeader = LenHeader {
    fix: Some((code::FIXMAP, code::FIXCOLLECTION_LEN_MAX)),
    len8: None,
    len16: code::MAP16,
    len32: code::MAP32,
};

fn encode_len<S: Sink + ?Sized>(
    sink: &mut S,
    header: &LenHeader,
    len: usize,
) -> Result<(), CodecError> {
    if let Some((base, max)) = header.fix {
        if len <= max {
            #[allow(clippy::cast_possible_truncation)]
            return sink.write_u8(base | len as u8);
        }
    }
    if let Some(len8) = header.len8 {
        if let Ok(n) = u8::try_from(len) {
            return sink.write(&[len8, n]);
        }
    }
    if let Ok(n) = u16::try_from(len) {
        let [a, b] = n.to_be_bytes();
        return sink.write(&[header.len16, a, b]);
    }
    let n = u32::try_from(len).map_err(|_| err_at(sink, ErrorCode::LengthOverflow))?;
    let mut buf = [0u8; 5];
    buf[0] = header.len32;
    buf[1..].copy_from_slice(&n.to_be_bytes());
    sink.write(&buf)
}

fn encode_ext_header<S: Sink + ?Sized>(
    sink: &mut S,
    ext_type: ExtensionType,
    len: usize,
) -> Result<(), CodecError> {
    let [t] = ext_type.code().to_be_bytes();
    let fixed = match len {
        1 => Some(code::FIXEXT1),
        2 => Some(code::FIXEXT2),
        4 => Some(code::FIXEXT4),
        8 => Some(code::FIXEXT8),
        16 => Some(code::FIXEXT16),
        _ => None,
    };
    if let Some(b) = fixed {
        return sink.write(&[b, t]);
    }
    if let Ok(n) = u8::try_from(len) {
        return sink.write(&[code::EXT8, n, t]);
    }
    if let Ok(n) = u16::try_from(len) {
        let [a, b] = n.to_be_bytes();
        return sink.write(&[code::EXT16, a, b, t]);
    }
    let n = u32::try_from(len).map_err(|_| err_at(sink, ErrorCode::LengthOverflow))?;
    let mut buf = [0u8; 6];
    buf[0] = code::EXT32;
    buf[1..5].copy_from_slice(&n.to_be_bytes());
    buf[5] = t;
    sink.write(&buf)
}

/// MessagePack encode primitives.
///
/// Every value takes its most compact form: integers use fixints and the narrowest sized
/// header regardless of the Rust type they came from, and lengths pick the smallest tier.
/// Floats keep their width (`f32` as float32, `f64` as float64).
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackEncoder;

impl MsgPackEncoder {
    /// Capabilities of the MessagePack format.
    pub const FEATURES: FormatFeatures = FormatFeatures::new(false, true, false, true);

    /// Construct an encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FormatEncoder for MsgPackEncoder {
    fn features(&self) -> FormatFeatures {
        Self::FEATURES
    }

    fn write_nil<S: Sink + ?Sized>(&self, out: &mut S) -> Result<(), CodecError> {
        out.write_u8(code::NIL)
    }

    fn write_bool<S: Sink + ?Sized>(&self, out: &mut S, v: bool) -> Result<(), CodecError> {
        out.write_u8(if v { code::TRUE } else { code::FALSE })
    }

    fn write_i32<S: Sink + ?Sized>(&self, out: &mut S, v: i32) -> Result<(), CodecError> {
        encode_int(out, i64::from(v))
    }

    fn write_i64<S: Sink + ?Sized>(&self, out: &mut S, v: i64) -> Result<(), CodecError> {
        encode_int(out, v)
    }

    fn write_u32<S: Sink + ?Sized>(&self, out: &mut S, v: u32) -> Result<(), CodecError> {
        encode_uint(out, u64::from(v))
    }

    fn write_u64<S: Sink + ?Sized>(&self, out: &mut S, v: u64) -> Result<(), CodecError> {
        encode_uint(out, v)
    }

    fn write_f32<S: Sink + ?Sized>(&self, out: &mut S, v: f32) -> Result<(), CodecError> {
        let mut buf = [0u8; 5];
        buf[0] = code::FLOAT32;
        buf[1..].copy_from_slice(&v.to_bits().to_be_bytes());
        out.write(&buf)
    }

    fn write_f64<S: Sink + ?Sized>(&self, out: &mut S, v: f64) -> Result<(), CodecError> {
        let mut buf = [0u8; 9];
        buf[0] = code::FLOAT64;
        buf[1..].copy_from_slice(&v.to_bits().to_be_bytes());
        out.write(&buf)
    }

    fn write_str_bytes<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        utf8: &[u8],
    ) -> Result<(), CodecError> {
        encode_len(out, &STR_HEADER, utf8.len())?;
        out.write(utf8)
    }

    fn write_bin<S: Sink + ?Sized>(&self, out: &mut S, v: &[u8]) -> Result<(), CodecError> {
        encode_len(out, &BIN_HEADER, v.len())?;
        out.write(v)
    }

    fn write_array_header<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        len: usize,
    ) -> Result<(), CodecError> {
        encode_len(out, &ARRAY_HEADER, len)
    }

    fn write_map_header<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        len: usize,
    ) -> Result<(), CodecError> {
        encode_len(out, &MAP_HEADER, len)
    }

    fn write_ext<S: Sink + ?Sized>(
        &self,
        out: &mut S,
        ext_type: ExtensionType,
        body: &[u8],
    ) -> Result<(), CodecError> {
        encode_ext_header(out, ext_type, body.len())?;
        out.write(body)
    }
}
