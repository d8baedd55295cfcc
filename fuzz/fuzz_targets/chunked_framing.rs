#![no_main]

use libfuzzer_sys::fuzz_target;
use sse_wire::{BodyFraming, BodyFramingDecoder};

fuzz_target!(|data: &[u8]| {
    let mut decoder = BodyFramingDecoder::new(BodyFraming::Chunked);
    let mut buf = Vec::new();
    for chunk in data.chunks(7) {
        buf.extend_from_slice(chunk);
        if decoder.decode(&mut buf).is_err() {
            return;
        }
        if decoder.is_complete() {
            return;
        }
    }
});
