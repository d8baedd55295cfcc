#![no_main]

use libfuzzer_sys::fuzz_target;
use sse_wire::{ResponseHead, SseClientContext, SseEvent, StreamObserver, StreamResult};

struct NullObserver;

impl StreamObserver for NullObserver {
    fn on_headers(&mut self, _head: &ResponseHead) {}
    fn on_event(&mut self, _event: &SseEvent) {}
    fn on_close(&mut self, _result: StreamResult, _head: Option<&ResponseHead>) {}
}

fuzz_target!(|data: &[u8]| {
    let mut context = SseClientContext::new(NullObserver);
    let mut buf = Vec::new();
    for chunk in data.chunks(9) {
        buf.extend_from_slice(chunk);
        if context.parse(&mut buf).is_err() {
            break;
        }
    }
    context.on_close(StreamResult::Ok);
    context.on_close(StreamResult::NetworkFailure);
});
