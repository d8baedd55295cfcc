use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bytes::Bytes;
use sse_wire::{format_comment, format_event, format_retry, SseEvent};
use tokio::sync::mpsc;

/// Narrow output capability the transport layer supplies. `write` reports
/// whether the transport accepted the bytes; acceptance does not guarantee
/// the remote processed them.
pub trait ResponseStream: Send + Sync {
    fn write(&self, bytes: &[u8]) -> bool;
    fn close(&self);
}

/// Server-side event writer. Formatting is stateless per call; the closed
/// guard is atomic so a producer task can race `close` safely, and `close`
/// detaches the stream so later sends fail instead of erroring.
pub struct SseWriter {
    stream: Mutex<Option<Box<dyn ResponseStream>>>,
    closed: AtomicBool,
}

impl SseWriter {
    pub fn new(stream: Box<dyn ResponseStream>) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
            closed: AtomicBool::new(false),
        }
    }

    pub fn send(&self, event: &SseEvent) -> bool {
        self.write_frame(format_event(event).as_bytes())
    }

    pub fn send_data(&self, data: &str) -> bool {
        self.send(&SseEvent::message(data))
    }

    pub fn send_typed(&self, event_type: &str, data: &str) -> bool {
        self.send(&SseEvent::typed(event_type, data))
    }

    /// Compact JSON payload; `event_type` of `None` sends a plain message
    /// event.
    pub fn send_json(&self, value: &serde_json::Value, event_type: Option<&str>) -> bool {
        let data = value.to_string();
        let event = match event_type {
            Some(event_type) => SseEvent::typed(event_type, data),
            None => SseEvent::message(data),
        };
        self.send(&event)
    }

    pub fn send_comment(&self, comment: &str) -> bool {
        self.write_frame(format_comment(comment).as_bytes())
    }

    pub fn send_retry(&self, retry_ms: u64) -> bool {
        self.write_frame(format_retry(retry_ms).as_bytes())
    }

    pub fn close(&self) {
        if self.closed.swap(true, Ordering::Relaxed) {
            return;
        }
        if let Some(stream) = self
            .stream
            .lock()
            .expect("writer stream lock poisoned")
            .take()
        {
            stream.close();
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Relaxed)
            && self
                .stream
                .lock()
                .expect("writer stream lock poisoned")
                .is_some()
    }

    fn write_frame(&self, bytes: &[u8]) -> bool {
        if self.closed.load(Ordering::Relaxed) {
            return false;
        }
        let stream = self.stream.lock().expect("writer stream lock poisoned");
        match stream.as_ref() {
            Some(stream) => stream.write(bytes),
            None => false,
        }
    }
}

impl Drop for SseWriter {
    fn drop(&mut self) {
        self.close();
    }
}

/// `ResponseStream` adapter that hands formatted frames to the connection
/// task over an unbounded channel. A dropped receiver makes `write` report
/// failure, which is how the writer learns the transport is gone.
pub struct ChannelResponseStream {
    frames: Mutex<Option<mpsc::UnboundedSender<Bytes>>>,
}

impl ChannelResponseStream {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Bytes>) {
        let (frames, receiver) = mpsc::unbounded_channel();
        (
            Self {
                frames: Mutex::new(Some(frames)),
            },
            receiver,
        )
    }
}

impl ResponseStream for ChannelResponseStream {
    fn write(&self, bytes: &[u8]) -> bool {
        let frames = self.frames.lock().expect("frame channel lock poisoned");
        match frames.as_ref() {
            Some(frames) => frames.send(Bytes::copy_from_slice(bytes)).is_ok(),
            None => false,
        }
    }

    fn close(&self) {
        self.frames
            .lock()
            .expect("frame channel lock poisoned")
            .take();
    }
}
