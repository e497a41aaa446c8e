#![cfg(feature = "alloc")]

use packcore::{
    DecodeItemResult, DecodeLimits, Decoder, ElementType, ErrorCode, ExtensionType, FormatEncoder,
    MsgPackEncoder,
};

const LENGTHS: [usize; 10] = [0, 1, 2, 4, 8, 16, 255, 256, 65_535, 65_536];

/// Every header form able to carry `len`, type code `t`.
fn headers(len: usize, t: i8) -> Vec<Vec<u8>> {
    let [t] = t.to_be_bytes();
    let mut out = Vec::new();
    let fixed = match len {
        1 => Some(0xd4),
        2 => Some(0xd5),
        4 => Some(0xd6),
        8 => Some(0xd7),
        16 => Some(0xd8),
        _ => None,
    };
    if let Some(b) = fixed {
        out.push(vec![b, t]);
    }
    if let Ok(n) = u8::try_from(len) {
        out.push(vec![0xc7, n, t]);
    }
    if let Ok(n) = u16::try_from(len) {
        let [a, b] = n.to_be_bytes();
        out.push(vec![0xc8, a, b, t]);
    }
    let mut ext32 = vec![0xc9];
    ext32.extend_from_slice(&u32::try_from(len).unwrap().to_be_bytes());
    ext32.push(t);
    out.push(ext32);
    out
}

fn body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn every_form_yields_exact_type_and_body() {
    for len in LENGTHS {
        let payload = body(len);
        for header in headers(len, 42) {
            let mut input = header.clone();
            input.extend_from_slice(&payload);
            input.push(0xc0);

            let mut dec = Decoder::new(&input, DecodeLimits::default()).unwrap();
            let item = dec.read_item().unwrap();
            assert_eq!(item.element_type(), ElementType::Extension);
            assert_eq!(item.extension_type(), Some(ExtensionType(42)));
            assert_eq!(item.extension_body().unwrap().len(), len, "{header:02x?}");
            assert_eq!(item.extension_body(), Some(&payload[..]));
            assert_eq!(item.raw_bytes(), item.extension_body());

            // The trailing nil is not part of the extension.
            assert_eq!(dec.position(), header.len() + len);
            assert_eq!(dec.remaining(), 1);
            dec.read_nil().unwrap();

            let mut dec = Decoder::new(&input, DecodeLimits::default()).unwrap();
            let (t, b) = dec.read_ext().unwrap();
            assert_eq!(t.code(), 42);
            assert_eq!(b, &payload[..]);
        }
    }
}

#[test]
fn body_one_byte_short_is_insufficient() {
    for len in LENGTHS.into_iter().filter(|&n| n > 0) {
        let payload = body(len - 1);
        for header in headers(len, 1) {
            let mut input = header.clone();
            input.extend_from_slice(&payload);

            let mut dec = Decoder::new(&input, DecodeLimits::default()).unwrap();
            assert_eq!(dec.read_item().unwrap(), DecodeItemResult::InsufficientInput);
            assert_eq!(dec.position(), 0);

            let err = dec.read_ext().unwrap_err();
            assert_eq!(err.code, ErrorCode::InsufficientInput);
            assert_eq!(dec.position(), 0);
        }
    }
}

#[test]
fn encoder_output_decodes_to_the_same_object() {
    for len in LENGTHS {
        let payload = body(len);
        let mut out = Vec::new();
        MsgPackEncoder
            .write_ext(&mut out, ExtensionType(-5), &payload)
            .unwrap();

        let mut dec = Decoder::new(&out, DecodeLimits::default()).unwrap();
        let (t, b) = dec.read_ext().unwrap();
        assert_eq!(t, ExtensionType(-5));
        assert!(t.is_reserved());
        assert_eq!(b, &payload[..]);
        assert!(dec.is_at_end());
    }
}

#[test]
fn extension_factory_shares_storage() {
    let body = [1u8, 2, 3];
    let item = DecodeItemResult::extension_type_object(ExtensionType(9), &body);
    assert_eq!(item.element_type(), ElementType::Extension);
    assert_eq!(item.extension_body(), Some(&body[..]));
    assert_eq!(item.raw_bytes(), Some(&body[..]));
    assert_eq!(item.collection_length(), None);
    assert!(!ExtensionType(0).is_reserved());
}
