#![cfg(feature = "std")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use packcore::{
    decode_str_utf16, encode_pooled, encode_utf16_str, BufferPool, CancellationGate, CodecError,
    DecodeLimits,
    Decoder, ErrorCode, ErrorKind, FormatEncoder, FormatEncoderOptions, HeapPool, MsgPackEncoder,
    NeverCancel, PooledSink, Rented, SharedArrayPool, Sink,
    DEFAULT_CANCELLATION_SUPPORT_THRESHOLD, DEFAULT_MAX_BYTE_BUFFER_LENGTH,
    DEFAULT_MAX_CHAR_BUFFER_LENGTH,
};

#[test]
fn option_defaults() {
    let options = FormatEncoderOptions::default();
    assert_eq!(options.cancellation_support_threshold(), 128 * 1024 * 1024);
    assert_eq!(options.max_byte_buffer_length(), 2 * 1024 * 1024);
    assert_eq!(options.max_char_buffer_length(), 2 * 1024 * 1024);
    assert!(!options.clears_buffer());
    assert_eq!(
        options.cancellation_support_threshold(),
        DEFAULT_CANCELLATION_SUPPORT_THRESHOLD
    );
}

#[test]
fn setters_fail_fast_below_minimum() {
    let mut builder = FormatEncoderOptions::builder();
    let err = builder.cancellation_support_threshold(0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(
        builder.max_byte_buffer_length(3).unwrap_err().code,
        ErrorCode::InvalidArgument
    );
    assert_eq!(
        builder.max_char_buffer_length(1).unwrap_err().code,
        ErrorCode::InvalidArgument
    );

    // Rejected values leave the builder untouched.
    let options = builder.build();
    assert_eq!(
        options.cancellation_support_threshold(),
        DEFAULT_CANCELLATION_SUPPORT_THRESHOLD
    );
    assert_eq!(options.max_byte_buffer_length(), DEFAULT_MAX_BYTE_BUFFER_LENGTH);

    builder
        .cancellation_support_threshold(1)
        .unwrap()
        .max_byte_buffer_length(4)
        .unwrap()
        .max_char_buffer_length(2)
        .unwrap()
        .clears_buffer(true);
    let minimal = builder.build();
    assert_eq!(minimal.cancellation_support_threshold(), 1);
    assert_eq!(minimal.max_byte_buffer_length(), 4);
    assert_eq!(minimal.max_char_buffer_length(), 2);
    assert!(minimal.clears_buffer());
}

#[test]
fn resets_restore_defaults_and_snapshots_are_independent() {
    let mut builder = FormatEncoderOptions::builder();
    builder.max_char_buffer_length(10).unwrap().clears_buffer(true);
    let before = builder.build();

    builder
        .reset_max_char_buffer_length()
        .reset_clears_buffer()
        .reset_cancellation_support_threshold()
        .reset_max_byte_buffer_length()
        .reset_byte_pool()
        .reset_char_pool();
    let after = builder.build();

    assert_eq!(before.max_char_buffer_length(), 10);
    assert!(before.clears_buffer());
    assert_eq!(after.max_char_buffer_length(), DEFAULT_MAX_CHAR_BUFFER_LENGTH);
    assert!(!after.clears_buffer());

    let round = before.to_builder().build();
    assert_eq!(round.max_char_buffer_length(), 10);
}

#[test]
fn shared_pool_reuses_and_bounds_buffers() {
    let pool = SharedArrayPool::<u8>::new(1);
    let mut a = pool.rent(64).unwrap();
    assert!(a.capacity() >= 64);
    a.extend_from_slice(b"secret");
    let b = pool.rent(64).unwrap();
    pool.give_back(a);
    pool.give_back(b);
    assert_eq!(pool.idle(), 1);

    let again = pool.rent(16).unwrap();
    assert!(again.is_empty());
    assert!(again.capacity() >= 64);
    assert_eq!(pool.idle(), 0);
}

#[derive(Default)]
struct Recording {
    returned: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool<u8> for Recording {
    fn rent(&self, min_capacity: usize) -> Result<Vec<u8>, CodecError> {
        Ok(Vec::with_capacity(min_capacity))
    }

    fn give_back(&self, buf: Vec<u8>) {
        self.returned.lock().unwrap().push(buf);
    }
}

#[test]
fn rented_returns_on_drop_and_clears_when_asked() {
    let pool = Recording::default();
    {
        let mut buf = Rented::rent(&pool, 8, true).unwrap();
        buf.extend_from_slice(&[0xaa; 8]);
    }
    {
        let mut buf = Rented::rent(&pool, 8, false).unwrap();
        buf.extend_from_slice(&[0xbb; 3]);
    }
    let returned = pool.returned.lock().unwrap();
    assert_eq!(returned.len(), 2);
    assert_eq!(returned[0].len(), returned[0].capacity());
    assert!(returned[0].iter().all(|&b| b == 0));
    assert_eq!(returned[1], [0xbb; 3]);
}

#[test]
fn detached_buffer_is_not_returned() {
    let pool = Recording::default();
    let detached = Rented::rent(&pool, 4, true).unwrap().into_vec();
    assert!(detached.capacity() >= 4);
    assert!(pool.returned.lock().unwrap().iter().all(Vec::is_empty));
}

#[test]
fn pooled_encode_returns_bytes() {
    let shared = Arc::new(SharedArrayPool::<u8>::default());
    let options = FormatEncoderOptions::builder()
        .byte_pool(shared.clone())
        .build();

    let bytes = encode_pooled(&MsgPackEncoder, &options, &NeverCancel, |e, out| {
        e.write_map_header(out, 1)?;
        e.write_str(out, "n")?;
        e.write_opt_i64(out, Some(-1))
    })
    .unwrap();
    assert_eq!(bytes, [0x81, 0xa1, b'n', 0xff]);

    // The scratch buffer went back to the shared pool.
    assert_eq!(shared.idle(), 1);
    assert!(shared.rent(1).unwrap().capacity() >= 256);
}

#[test]
fn pooled_sink_enforces_ceiling() {
    let options = FormatEncoderOptions::builder()
        .max_byte_buffer_length(4)
        .unwrap()
        .build();
    let err = encode_pooled(&MsgPackEncoder, &options, &NeverCancel, |e, out| {
        e.write_u32(out, 1)?;
        e.write_u32(out, 70_000)
    })
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferLimitExceeded);
    assert_eq!(err.offset, 1);
}

#[test]
fn cancellation_is_checked_after_threshold() {
    let options = FormatEncoderOptions::builder()
        .cancellation_support_threshold(8)
        .unwrap()
        .build();
    let cancel = AtomicBool::new(false);
    let mut sink = PooledSink::new(&options, &cancel).unwrap();
    sink.write(&[0; 6]).unwrap();
    cancel.store(true, Ordering::Release);
    // Below the threshold the signal is not polled.
    sink.write(&[0; 1]).unwrap();
    let err = sink.write(&[0; 1]).unwrap_err();
    assert_eq!(err.code, ErrorCode::Cancelled);
    assert_eq!(err.offset, 7);
    assert_eq!(sink.as_bytes().len(), 7);
    assert_eq!(sink.position(), 7);
}

#[test]
fn gate_rejects_zero_threshold() {
    assert_eq!(
        CancellationGate::new(0).unwrap_err().code,
        ErrorCode::InvalidArgument
    );
    let mut gate = CancellationGate::new(2).unwrap();
    gate.advance(1, &NeverCancel, 0).unwrap();
    gate.advance(5, &NeverCancel, 1).unwrap();
}

#[test]
fn utf16_round_trip() {
    let options = FormatEncoderOptions::default();
    let text = "grüße 👋";
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut out = Vec::new();
    encode_utf16_str(&MsgPackEncoder, &options, &mut out, &units).unwrap();
    let mut expected = Vec::new();
    MsgPackEncoder.write_str(&mut expected, text).unwrap();
    assert_eq!(out, expected);

    let mut dec = Decoder::new(&out, DecodeLimits::default()).unwrap();
    let chars = decode_str_utf16(&mut dec, &options).unwrap();
    assert_eq!(&chars[..], &units[..]);
    assert!(dec.is_at_end());
}

#[test]
fn utf16_rejects_unpaired_surrogate() {
    let options = FormatEncoderOptions::default();
    let mut out = Vec::new();
    let err = encode_utf16_str(&MsgPackEncoder, &options, &mut out, &[0x61, 0xd800]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
    assert!(out.is_empty());
}

#[test]
fn utf16_buffers_respect_ceilings() {
    let options = FormatEncoderOptions::builder()
        .max_byte_buffer_length(4)
        .unwrap()
        .max_char_buffer_length(2)
        .unwrap()
        .build();

    let units: Vec<u16> = "hello".encode_utf16().collect();
    let mut out = Vec::new();
    let err = encode_utf16_str(&MsgPackEncoder, &options, &mut out, &units).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferLimitExceeded);

    let mut encoded = Vec::new();
    MsgPackEncoder.write_str(&mut encoded, "abc").unwrap();
    let mut dec = Decoder::new(&encoded, DecodeLimits::default()).unwrap();
    let err = decode_str_utf16(&mut dec, &options).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferLimitExceeded);
    assert_eq!(dec.position(), 0);
}

#[test]
fn heap_pool_allocates_fresh() {
    let v: Vec<u16> = HeapPool.rent(10).unwrap();
    assert!(v.capacity() >= 10);
    BufferPool::<u16>::give_back(&HeapPool, v);
}
