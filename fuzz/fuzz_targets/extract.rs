#![no_main]

use libfuzzer_sys::fuzz_target;
use twkb::{extract_envelope, extract_id_list, extract_size};

fuzz_target!(|data: &[u8]| {
    // The partial extractors must never panic, whatever the bytes.
    let _ = extract_size(data);
    let _ = extract_envelope(data);
    let _ = extract_id_list(data);
});
