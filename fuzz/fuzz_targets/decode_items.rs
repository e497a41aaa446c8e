#![no_main]

use libfuzzer_sys::fuzz_target;

use packcore::{DecodeLimits, Decoder};

fn fuzz_limits(input_len: usize) -> DecodeLimits {
    let max = input_len.min(1 << 20);
    DecodeLimits {
        max_input_bytes: max,
        max_depth: 64,
        max_array_len: 1 << 12,
        max_map_len: 1 << 12,
        max_str_len: max,
        max_bin_len: max,
        max_ext_len: max,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut dec) = Decoder::new(data, fuzz_limits(data.len())) else {
        return;
    };
    let mut skipper = Decoder::new(data, fuzz_limits(data.len())).unwrap();
    loop {
        let before = skipper.position();
        match skipper.skip_value() {
            Ok(()) => assert!(skipper.position() > before),
            Err(_) => {
                assert_eq!(skipper.position(), before);
                assert_eq!(skipper.context().current_depth(), 0);
                break;
            }
        }
    }
    while let Ok(item) = dec.read_item_strict() {
        let _ = item.element_type();
    }
});
