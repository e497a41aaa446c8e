// Property-based tests for the codec core.
//
// Sizes stay small so the suite runs quickly.
#![cfg(feature = "alloc")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::BTreeSet;

use packcore::{
    CollectionContext, DecodeItemResult, DecodeLimits, Decoder, ElementType, ErrorCode,
    FormatEncoder, MsgPackEncoder, ScalarStringTrie, StreamBuffer,
};

#[derive(Debug, Clone)]
enum Scalar {
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    Bool(bool),
    Nil,
}

fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<i64>().prop_map(Scalar::I64),
        prop_oneof![Just(i64::MIN), Just(i64::MAX), Just(-33_i64), Just(-32_i64)]
            .prop_map(Scalar::I64),
        any::<u64>().prop_map(Scalar::U64),
        prop_oneof![Just(u64::MAX), Just(127_u64), Just(128_u64), Just(65_536_u64)]
            .prop_map(Scalar::U64),
        any::<u32>().prop_map(|bits| Scalar::F32(f32::from_bits(bits))),
        any::<u64>().prop_map(|bits| Scalar::F64(f64::from_bits(bits))),
        "[a-zA-Z0-9 é👋]{0,40}".prop_map(Scalar::Str),
        proptest::collection::vec(any::<u8>(), 0..300).prop_map(Scalar::Bin),
        any::<bool>().prop_map(Scalar::Bool),
        Just(Scalar::Nil),
    ]
}

fn write_scalar(out: &mut Vec<u8>, v: &Scalar) {
    let e = MsgPackEncoder;
    match v {
        Scalar::I64(i) => e.write_i64(out, *i),
        Scalar::U64(u) => e.write_u64(out, *u),
        Scalar::F32(f) => e.write_f32(out, *f),
        Scalar::F64(f) => e.write_f64(out, *f),
        Scalar::Str(s) => e.write_str(out, s),
        Scalar::Bin(b) => e.write_bin(out, b),
        Scalar::Bool(b) => e.write_bool(out, *b),
        Scalar::Nil => e.write_nil(out),
    }
    .unwrap();
}

fn check_scalar(dec: &mut Decoder<'_>, v: &Scalar) {
    match v {
        Scalar::I64(i) => {
            if *i >= 0 {
                assert_eq!(dec.read_u64().unwrap(), i.unsigned_abs());
            } else {
                assert_eq!(dec.read_i64().unwrap(), *i);
            }
        }
        Scalar::U64(u) => assert_eq!(dec.read_u64().unwrap(), *u),
        Scalar::F32(f) => assert_eq!(dec.read_f32().unwrap().to_bits(), f.to_bits()),
        Scalar::F64(f) => assert_eq!(dec.read_f64().unwrap().to_bits(), f.to_bits()),
        Scalar::Str(s) => assert_eq!(dec.read_str().unwrap(), s),
        Scalar::Bin(b) => assert_eq!(dec.read_bin().unwrap(), &b[..]),
        Scalar::Bool(b) => assert_eq!(dec.read_bool().unwrap(), *b),
        Scalar::Nil => dec.read_nil().unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn scalars_round_trip(values in proptest::collection::vec(arb_scalar(), 1..16)) {
        let mut out = Vec::new();
        for v in &values {
            write_scalar(&mut out, v);
        }
        let mut dec = Decoder::new(&out, DecodeLimits::default()).unwrap();
        for v in &values {
            check_scalar(&mut dec, v);
        }
        prop_assert!(dec.is_at_end());
    }

    #[test]
    fn integers_classify_by_range(v in any::<i64>()) {
        let mut out = Vec::new();
        MsgPackEncoder.write_i64(&mut out, v).unwrap();
        let mut dec = Decoder::new(&out, DecodeLimits::default()).unwrap();
        let item = dec.read_item().unwrap();
        let expected = if i32::try_from(v).is_ok() {
            ElementType::Int32
        } else {
            ElementType::Int64
        };
        prop_assert_eq!(item.element_type(), expected);
        prop_assert_eq!(item.as_i64(), Some(v));
    }

    #[test]
    fn stream_split_anywhere_matches_whole(
        values in proptest::collection::vec(arb_scalar(), 1..8),
        split in any::<prop::sample::Index>(),
    ) {
        // Wrap in an array so the whole message is one value.
        let mut out = Vec::new();
        MsgPackEncoder.write_array_header(&mut out, values.len()).unwrap();
        for v in &values {
            write_scalar(&mut out, v);
        }
        let at = split.index(out.len() + 1);

        let mut stream = StreamBuffer::new(DecodeLimits::default());
        stream.push(&out[..at]).unwrap();
        let first = stream.decode(|dec| dec.read_raw_value().map(<[u8]>::to_vec));
        if at < out.len() {
            let err = first.unwrap_err();
            prop_assert_eq!(err.code, ErrorCode::InsufficientInput);
            prop_assert_eq!(stream.len(), at);
            stream.push(&out[at..]).unwrap();
            let raw = stream
                .decode(|dec| dec.read_raw_value().map(<[u8]>::to_vec))
                .unwrap();
            prop_assert_eq!(raw, out.clone());
        } else {
            prop_assert_eq!(first.unwrap(), out.clone());
        }
        prop_assert!(stream.is_empty());
    }

    #[test]
    fn truncation_never_consumes(values in proptest::collection::vec(arb_scalar(), 1..4)) {
        let mut out = Vec::new();
        MsgPackEncoder.write_array_header(&mut out, values.len()).unwrap();
        for v in &values {
            write_scalar(&mut out, v);
        }
        for cut in 0..out.len() {
            let mut dec = Decoder::new(&out[..cut], DecodeLimits::default()).unwrap();
            let err = dec.skip_value().unwrap_err();
            prop_assert_eq!(err.code, ErrorCode::InsufficientInput);
            prop_assert_eq!(dec.position(), 0);
            prop_assert_eq!(dec.context().current_depth(), 0);
        }
    }

    #[test]
    fn depth_stays_in_bounds(max in 1_usize..16, ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let mut ctx = CollectionContext::new(8, 8, max).unwrap();
        for inc in ops {
            let before = ctx.current_depth();
            if inc {
                match ctx.increment_depth(0) {
                    Ok(prev) => prop_assert_eq!(prev, before),
                    Err(err) => {
                        prop_assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
                        prop_assert_eq!(before, max);
                    }
                }
            } else {
                match ctx.decrement_depth() {
                    Ok(prev) => prop_assert_eq!(prev, before),
                    Err(err) => {
                        prop_assert_eq!(err.code, ErrorCode::DepthUnderflow);
                        prop_assert_eq!(before, 0);
                    }
                }
            }
            prop_assert!(ctx.current_depth() <= max);
        }
    }

    #[test]
    fn trie_finds_exactly_inserted_keys(
        keys in proptest::collection::btree_set(proptest::collection::vec(any::<u8>(), 0..24), 0..48),
        probes in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..24), 0..32),
    ) {
        let mut trie = ScalarStringTrie::new(usize::MAX);
        for (i, k) in keys.iter().enumerate() {
            prop_assert!(trie.try_add_raw(k, i));
        }
        prop_assert_eq!(trie.len(), keys.len());
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(*trie.get_or_default(k), i);
            prop_assert!(!trie.try_add_raw(k, 0));
        }
        let known: BTreeSet<&Vec<u8>> = keys.iter().collect();
        for p in &probes {
            if !known.contains(p) {
                prop_assert_eq!(*trie.get_or_default(p), usize::MAX);
            }
        }
    }

    #[test]
    fn item_results_match_typed_reads(v in any::<u64>()) {
        let mut out = Vec::new();
        MsgPackEncoder.write_u64(&mut out, v).unwrap();
        let mut dec = Decoder::new(&out, DecodeLimits::default()).unwrap();
        let item = dec.read_item().unwrap();
        prop_assert_eq!(item.as_u64(), Some(v));
        prop_assert!(!matches!(item, DecodeItemResult::InsufficientInput));
    }
}
