#![no_main]

use libfuzzer_sys::fuzz_target;

use packcore::{DecodeLimits, Decoder, StreamBuffer};

fuzz_target!(|data: &[u8]| {
    let Some((&split, data)) = data.split_first() else {
        return;
    };
    let limits = DecodeLimits::for_bytes(data.len().max(1)).with_max_depth(64);

    let whole = Decoder::new(data, limits)
        .ok()
        .and_then(|mut dec| dec.read_raw_value().ok().map(<[u8]>::to_vec));

    let at = usize::from(split).min(data.len());
    let mut stream = StreamBuffer::new(limits);
    stream.push(&data[..at]).unwrap();
    let first = stream.decode(|dec| dec.read_raw_value().map(<[u8]>::to_vec));
    let split_result = match first {
        Ok(raw) => Some(raw),
        Err(err) if err.is_retryable() => {
            stream.push(&data[at..]).unwrap();
            stream
                .decode(|dec| dec.read_raw_value().map(<[u8]>::to_vec))
                .ok()
        }
        Err(_) => None,
    };
    assert_eq!(whole, split_result);
});
