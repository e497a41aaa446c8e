#![cfg(feature = "alloc")]

use packcore::{
    CodecError, ErrorCode, ExtensionType, FormatEncoder, FormatFeatures, MsgPackEncoder, Sink,
    SliceSink,
};

fn enc(f: impl FnOnce(&MsgPackEncoder, &mut Vec<u8>) -> Result<(), CodecError>) -> Vec<u8> {
    let mut out = Vec::new();
    f(&MsgPackEncoder::new(), &mut out).unwrap();
    out
}

#[test]
fn unsigned_integers_use_smallest_form() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7f]),
        (128, &[0xcc, 0x80]),
        (255, &[0xcc, 0xff]),
        (256, &[0xcd, 0x01, 0x00]),
        (65_535, &[0xcd, 0xff, 0xff]),
        (65_536, &[0xce, 0x00, 0x01, 0x00, 0x00]),
        (u64::from(u32::MAX), &[0xce, 0xff, 0xff, 0xff, 0xff]),
        (1 << 32, &[0xcf, 0, 0, 0, 1, 0, 0, 0, 0]),
        (u64::MAX, &[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
    ];
    for &(v, expected) in cases {
        assert_eq!(enc(|e, o| e.write_u64(o, v)), expected, "u64 {v}");
    }
    assert_eq!(enc(|e, o| e.write_u32(o, 200)), [0xcc, 200]);
}

#[test]
fn signed_integers_use_smallest_form() {
    let cases: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0xcc, 0x80]),
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0xd0, 0xdf]),
        (-128, &[0xd0, 0x80]),
        (-129, &[0xd1, 0xff, 0x7f]),
        (-32_768, &[0xd1, 0x80, 0x00]),
        (-32_769, &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
        (
            i64::from(i32::MIN) - 1,
            &[0xd3, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff],
        ),
        (i64::MIN, &[0xd3, 0x80, 0, 0, 0, 0, 0, 0, 0]),
        (i64::MAX, &[0xcf, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
    ];
    for &(v, expected) in cases {
        assert_eq!(enc(|e, o| e.write_i64(o, v)), expected, "i64 {v}");
    }
    assert_eq!(enc(|e, o| e.write_i32(o, i32::MIN)), [0xd2, 0x80, 0, 0, 0]);
}

#[test]
fn floats_keep_their_width() {
    assert_eq!(enc(|e, o| e.write_f32(o, 1.5)), [0xca, 0x3f, 0xc0, 0x00, 0x00]);
    assert_eq!(
        enc(|e, o| e.write_f64(o, 1.5)),
        [0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]
    );
    let nan = enc(|e, o| e.write_f64(o, f64::NAN));
    assert_eq!(nan[0], 0xcb);
    assert_eq!(&nan[1..], &f64::NAN.to_bits().to_be_bytes());
}

#[test]
fn bool_and_nil_are_single_bytes() {
    assert_eq!(enc(|e, o| e.write_nil(o)), [0xc0]);
    assert_eq!(enc(|e, o| e.write_bool(o, false)), [0xc2]);
    assert_eq!(enc(|e, o| e.write_bool(o, true)), [0xc3]);
}

#[test]
fn nullable_overloads_route_none_to_nil() {
    assert_eq!(enc(|e, o| e.write_opt_i32(o, None)), [0xc0]);
    assert_eq!(enc(|e, o| e.write_opt_i32(o, Some(5))), [0x05]);
    assert_eq!(enc(|e, o| e.write_opt_i64(o, Some(-1))), [0xff]);
    assert_eq!(enc(|e, o| e.write_opt_u32(o, None)), [0xc0]);
    assert_eq!(enc(|e, o| e.write_opt_u64(o, Some(128))), [0xcc, 0x80]);
    assert_eq!(enc(|e, o| e.write_opt_bool(o, Some(true))), [0xc3]);
    assert_eq!(enc(|e, o| e.write_opt_f32(o, None)), [0xc0]);
    assert_eq!(enc(|e, o| e.write_opt_f64(o, None)), [0xc0]);
    assert_eq!(enc(|e, o| e.write_value(o, Some("hi"))), [0xa2, b'h', b'i']);
    assert_eq!(enc(|e, o| e.write_value(o, None::<&str>)), [0xc0]);
}

fn str_header(len: usize) -> Vec<u8> {
    let s = "x".repeat(len);
    let mut out = enc(|e, o| e.write_str(o, &s));
    out.truncate(out.len() - len);
    out
}

#[test]
fn string_headers_cover_every_tier() {
    assert_eq!(str_header(0), [0xa0]);
    assert_eq!(str_header(31), [0xbf]);
    assert_eq!(str_header(32), [0xd9, 32]);
    assert_eq!(str_header(255), [0xd9, 0xff]);
    assert_eq!(str_header(256), [0xda, 0x01, 0x00]);
    assert_eq!(str_header(65_535), [0xda, 0xff, 0xff]);
    assert_eq!(str_header(65_536), [0xdb, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn binary_headers_have_no_fix_form() {
    assert_eq!(enc(|e, o| e.write_bin(o, &[])), [0xc4, 0x00]);
    assert_eq!(enc(|e, o| e.write_bin(o, &[9])), [0xc4, 0x01, 9]);
    let big = enc(|e, o| e.write_bin(o, &[0u8; 256]));
    assert_eq!(&big[..3], &[0xc5, 0x01, 0x00]);
    assert_eq!(big.len(), 259);
    let huge = enc(|e, o| e.write_bin(o, &vec![0u8; 65_536]));
    assert_eq!(&huge[..5], &[0xc6, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn collection_headers_cover_every_tier() {
    let cases: &[(usize, &[u8], &[u8])] = &[
        (0, &[0x90], &[0x80]),
        (15, &[0x9f], &[0x8f]),
        (16, &[0xdc, 0x00, 0x10], &[0xde, 0x00, 0x10]),
        (65_535, &[0xdc, 0xff, 0xff], &[0xde, 0xff, 0xff]),
        (
            65_536,
            &[0xdd, 0x00, 0x01, 0x00, 0x00],
            &[0xdf, 0x00, 0x01, 0x00, 0x00],
        ),
    ];
    for &(n, array, map) in cases {
        assert_eq!(enc(|e, o| e.write_array_header(o, n)), array, "array {n}");
        assert_eq!(enc(|e, o| e.write_map_header(o, n)), map, "map {n}");
    }
}

#[test]
fn extension_headers_prefer_fixext() {
    let t = ExtensionType(7);
    let header = |len: usize| {
        let body = vec![0xaa; len];
        let mut out = enc(|e, o| e.write_ext(o, t, &body));
        assert!(out[out.len() - len..].iter().all(|&b| b == 0xaa));
        out.truncate(out.len() - len);
        out
    };
    assert_eq!(header(0), [0xc7, 0x00, 7]);
    assert_eq!(header(1), [0xd4, 7]);
    assert_eq!(header(2), [0xd5, 7]);
    assert_eq!(header(3), [0xc7, 0x03, 7]);
    assert_eq!(header(4), [0xd6, 7]);
    assert_eq!(header(8), [0xd7, 7]);
    assert_eq!(header(16), [0xd8, 7]);
    assert_eq!(header(17), [0xc7, 0x11, 7]);
    assert_eq!(header(255), [0xc7, 0xff, 7]);
    assert_eq!(header(256), [0xc8, 0x01, 0x00, 7]);
    assert_eq!(header(65_536), [0xc9, 0x00, 0x01, 0x00, 0x00, 7]);

    let negative = enc(|e, o| e.write_ext(o, ExtensionType(-1), &[1, 2, 3, 4]));
    assert_eq!(negative, [0xd6, 0xff, 1, 2, 3, 4]);
}

#[test]
fn msgpack_advertises_its_capabilities() {
    let f = MsgPackEncoder::new().features();
    assert!(!f.is_contextful());
    assert!(f.can_count_collection_items());
    assert!(!f.can_specify_string_encoding());
    assert!(f.supports_extension_types());
    assert_eq!(f, MsgPackEncoder::FEATURES);
}

#[test]
fn slice_sink_rejects_overflow() {
    let mut buf = [0u8; 4];
    let mut sink = SliceSink::new(&mut buf);
    MsgPackEncoder.write_u32(&mut sink, 1).unwrap();
    let err = MsgPackEncoder.write_u32(&mut sink, 70_000).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferLimitExceeded);
    assert_eq!(err.offset, 1);
    assert_eq!(sink.written(), &[0x01]);
    assert_eq!(sink.remaining(), 3);
}

/// A format with no sequences, collections or extensions.
struct ScalarOnly;

impl FormatEncoder for ScalarOnly {
    fn features(&self) -> FormatFeatures {
        FormatFeatures::NONE
    }

    fn write_nil<S: Sink + ?Sized>(&self, out: &mut S) -> Result<(), CodecError> {
        out.write_u8(b'n')
    }

    fn write_bool<S: Sink + ?Sized>(&self, out: &mut S, v: bool) -> Result<(), CodecError> {
        out.write_u8(if v { b't' } else { b'f' })
    }

    fn write_i32<S: Sink + ?Sized>(&self, out: &mut S, v: i32) -> Result<(), CodecError> {
        out.write(&v.to_le_bytes())
    }

    fn write_i64<S: Sink + ?Sized>(&self, out: &mut S, v: i64) -> Result<(), CodecError> {
        out.write(&v.to_le_bytes())
    }

    fn write_u32<S: Sink + ?Sized>(&self, out: &mut S, v: u32) -> Result<(), CodecError> {
        out.write(&v.to_le_bytes())
    }

    fn write_u64<S: Sink + ?Sized>(&self, out: &mut S, v: u64) -> Result<(), CodecError> {
        out.write(&v.to_le_bytes())
    }

    fn write_f32<S: Sink + ?Sized>(&self, out: &mut S, v: f32) -> Result<(), CodecError> {
        out.write(&v.to_le_bytes())
    }

    fn write_f64<S: Sink + ?Sized>(&self, out: &mut S, v: f64) -> Result<(), CodecError> {
        out.write(&v.to_le_bytes())
    }
}

#[test]
fn unsupported_primitives_report_not_supported() {
    let mut out = Vec::new();
    ScalarOnly.write_opt_i32(&mut out, None).unwrap();
    ScalarOnly.write_opt_i32(&mut out, Some(1)).unwrap();
    assert_eq!(out, [b'n', 1, 0, 0, 0]);

    let err = ScalarOnly.write_str(&mut out, "a").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotSupported);
    assert_eq!(err.offset, 5);
    assert_eq!(
        ScalarOnly.write_bin(&mut out, &[]).unwrap_err().code,
        ErrorCode::NotSupported
    );
    assert_eq!(
        ScalarOnly.write_array_header(&mut out, 1).unwrap_err().code,
        ErrorCode::NotSupported
    );
    assert_eq!(
        ScalarOnly.write_map_header(&mut out, 1).unwrap_err().code,
        ErrorCode::NotSupported
    );
    assert_eq!(
        ScalarOnly
            .write_ext(&mut out, ExtensionType(1), &[])
            .unwrap_err()
            .code,
        ErrorCode::NotSupported
    );
    assert_eq!(out.len(), 5);
}
