#![no_main]

use libfuzzer_sys::fuzz_target;
use twkb::{decode_with_limits, encode, DecodeLimits, EncodeOptions};

fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits::for_testing();
    let Ok((geometry, consumed)) = decode_with_limits(data, &limits) else {
        return;
    };
    assert!(consumed <= data.len());

    // Whatever decodes must re-encode and decode to the same value.
    let opts = EncodeOptions::new().precision_z(7).precision_m(7);
    if let Ok(bytes) = encode(&geometry, 7, &opts) {
        let (again, _) = decode_with_limits(&bytes, &limits).expect("re-decode");
        assert_eq!(again.kind(), geometry.kind());
    }
});
