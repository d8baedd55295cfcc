use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::body_framing::{take_line, BodyFramingDecoder, FramingError};
use crate::event::SseEvent;
use crate::event_parser::SseEventParser;
use crate::head_parser::{parse_header_line, parse_status_line, ResponseHead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    ExpectHeaders,
    ExpectBody,
    Closed,
}

/// Why the stream ended, as reported to the closed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamResult {
    Ok,
    Timeout,
    BadResponse,
    NetworkFailure,
}

impl StreamResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Timeout => "timeout",
            Self::BadResponse => "bad_response",
            Self::NetworkFailure => "network_failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
    #[error("stream already closed")]
    Closed,
    #[error(transparent)]
    Framing(#[from] FramingError),
}

/// Shared flag a timer can set from another task. While set, decoded events
/// are swallowed instead of delivered; the close notification still fires.
#[derive(Debug, Clone, Default)]
pub struct TimeoutFlag(Arc<AtomicBool>);

impl TimeoutFlag {
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Single consumer interface for everything a client stream produces. The
/// headers and close notifications each fire at most once per context.
pub trait StreamObserver {
    fn on_headers(&mut self, head: &ResponseHead);
    fn on_event(&mut self, event: &SseEvent);
    fn on_close(&mut self, result: StreamResult, head: Option<&ResponseHead>);
}

/// Client-side connection lifecycle: parse the status line and headers once,
/// pick the body framing, then route every further byte through the framing
/// decoder into the event parser.
///
/// Not safe for concurrent use; the caller's reactor is expected to
/// serialize `parse` invocations per connection.
pub struct SseClientContext<O: StreamObserver> {
    observer: O,
    status: StreamStatus,
    head: Option<ResponseHead>,
    status_line_parsed: bool,
    framing: Option<BodyFramingDecoder>,
    event_parser: SseEventParser,
    timed_out: TimeoutFlag,
    closed_notified: bool,
}

impl<O: StreamObserver> SseClientContext<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            status: StreamStatus::ExpectHeaders,
            head: None,
            status_line_parsed: false,
            framing: None,
            event_parser: SseEventParser::new(),
            timed_out: TimeoutFlag::default(),
            closed_notified: false,
        }
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    pub fn headers_received(&self) -> bool {
        self.status != StreamStatus::ExpectHeaders
    }

    pub fn is_closed(&self) -> bool {
        self.status == StreamStatus::Closed
    }

    pub fn response(&self) -> Option<&ResponseHead> {
        self.head.as_ref()
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.event_parser.last_event_id()
    }

    /// Handle for a deadline timer running elsewhere.
    pub fn timeout_flag(&self) -> TimeoutFlag {
        self.timed_out.clone()
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out.is_set()
    }

    /// Consumes whatever `buf` holds that can be interpreted right now and
    /// leaves the rest for the next delivery. Incomplete input is not an
    /// error; a malformed status line or broken chunk framing is, and aborts
    /// the parse.
    pub fn parse(&mut self, buf: &mut Vec<u8>) -> Result<(), ParseError> {
        if self.status == StreamStatus::Closed {
            return Err(ParseError::Closed);
        }
        if self.status == StreamStatus::ExpectHeaders {
            self.parse_headers(buf)?;
        }
        if self.status == StreamStatus::ExpectBody {
            self.parse_body(buf)?;
        }
        Ok(())
    }

    /// Idempotent close: the observer's close notification fires at most
    /// once no matter how many sources (timeout, stream end, caller) race
    /// to report it.
    pub fn on_close(&mut self, result: StreamResult) {
        if self.closed_notified {
            return;
        }
        self.closed_notified = true;
        self.status = StreamStatus::Closed;
        self.observer.on_close(result, self.head.as_ref());
    }

    fn parse_headers(&mut self, buf: &mut Vec<u8>) -> Result<(), ParseError> {
        while let Some(line) = take_line(buf) {
            if !self.status_line_parsed {
                let text = String::from_utf8_lossy(&line);
                let (version, status_code, reason_phrase) = parse_status_line(&text)
                    .ok_or_else(|| ParseError::MalformedStatusLine(text.clone().into_owned()))?;
                self.head = Some(ResponseHead {
                    version,
                    status_code,
                    reason_phrase,
                    headers: Vec::new(),
                });
                self.status_line_parsed = true;
                continue;
            }

            if line.is_empty() {
                // End of the header block: pick the framing mode and hand
                // the headers out exactly once.
                let head = self
                    .head
                    .as_ref()
                    .expect("status line parsed before header block end");
                self.framing = Some(BodyFramingDecoder::new(head.framing_mode()));
                self.observer.on_headers(head);
                self.status = StreamStatus::ExpectBody;
                return Ok(());
            }

            let text = String::from_utf8_lossy(&line);
            if let Some(header) = parse_header_line(&text) {
                if let Some(head) = self.head.as_mut() {
                    head.headers.push(header);
                }
            }
        }
        Ok(())
    }

    fn parse_body(&mut self, buf: &mut Vec<u8>) -> Result<(), ParseError> {
        let Some(framing) = self.framing.as_mut() else {
            return Ok(());
        };
        let progress = framing.decode(buf)?;
        for event in self.event_parser.push_bytes(&progress.payload) {
            if !self.timed_out.is_set() {
                self.observer.on_event(&event);
            }
        }
        if progress.body_complete {
            self.status = StreamStatus::Closed;
        }
        Ok(())
    }
}
