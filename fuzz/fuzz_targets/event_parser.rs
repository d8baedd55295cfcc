#![no_main]

use libfuzzer_sys::fuzz_target;
use sse_wire::SseEventParser;

fuzz_target!(|data: &[u8]| {
    let mut parser = SseEventParser::new();
    for chunk in data.chunks(5) {
        let _ = parser.push_bytes(chunk);
    }
    let _ = parser.last_event_id();
});
