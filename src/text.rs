//! UTF-16 text through pooled scratch buffers.

use crate::alloc_util::try_reserve;
use crate::{
    CodecError, Decoder, ErrorCode, FormatEncoder, FormatEncoderOptions, Rented, Sink,
};

/// Encode UTF-16 text as a string, transcoding through a rented byte buffer.
///
/// # Errors
///
/// Returns `InvalidArgument` for an unpaired surrogate, `BufferLimitExceeded` if the UTF-8
/// form exceeds `max_byte_buffer_length`, plus any encoder or sink error. Nothing is written
/// to `out` unless transcoding succeeded.
pub fn encode_utf16_str<E, S>(
    encoder: &E,
    options: &FormatEncoderOptions,
    out: &mut S,
    units: &[u16],
) -> Result<(), CodecError>
where
    E: FormatEncoder,
    S: Sink + ?Sized,
{
    let pos = out.position();
    let max = options.max_byte_buffer_length();
    let estimate = units.len().saturating_mul(3).min(max);
    let mut scratch: Rented<'_, u8> =
        Rented::rent(options.byte_pool(), estimate, options.clears_buffer())?;

    for decoded in char::decode_utf16(units.iter().copied()) {
        let c = decoded.map_err(|_| CodecError::new(ErrorCode::InvalidArgument, pos))?;
        let mut tmp = [0u8; 4];
        let utf8 = c.encode_utf8(&mut tmp).as_bytes();
        if scratch.len() + utf8.len() > max {
            codec_debug!(max, "utf-16 transcode exceeds byte buffer ceiling");
            return Err(CodecError::new(ErrorCode::BufferLimitExceeded, pos));
        }
        try_reserve(&mut *scratch, utf8.len(), pos)?;
        scratch.extend_from_slice(utf8);
    }
    encoder.write_str_bytes(out, &scratch)
}

/// Decode a string into a rented UTF-16 buffer.
///
/// The buffer goes back to `options`' char pool when the guard drops.
///
/// # Errors
///
/// Returns every error of [`Decoder::read_str`], and `BufferLimitExceeded` if the text needs
/// more than `max_char_buffer_length` code units. Nothing is consumed on error.
pub fn decode_str_utf16<'p>(
    dec: &mut Decoder<'_>,
    options: &'p FormatEncoderOptions,
) -> Result<Rented<'p, u16>, CodecError> {
    let start = dec.position();
    let s = dec.read_str()?;
    let r = widen(s, options, start);
    if r.is_err() {
        dec.rewind(start);
    }
    r
}

fn widen<'p>(
    s: &str,
    options: &'p FormatEncoderOptions,
    offset: usize,
) -> Result<Rented<'p, u16>, CodecError> {
    let units = s.encode_utf16().count();
    let max = options.max_char_buffer_length();
    if units > max {
        codec_debug!(units, max, "string exceeds char buffer ceiling");
        return Err(CodecError::new(ErrorCode::BufferLimitExceeded, offset));
    }
    let mut buf = Rented::rent(options.char_pool(), units, options.clears_buffer())?;
    buf.extend(s.encode_utf16());
    Ok(buf)
}
