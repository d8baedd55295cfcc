mod body_framing;
mod client_context;
mod event;
mod event_format;
mod event_parser;
mod head_parser;

pub use body_framing::{BodyFraming, BodyFramingDecoder, FramingError, FramingProgress};
pub use client_context::{
    ParseError, SseClientContext, StreamObserver, StreamResult, StreamStatus, TimeoutFlag,
};
pub use event::SseEvent;
pub use event_format::{format_comment, format_event, format_retry};
pub use event_parser::SseEventParser;
pub use head_parser::{Header, HttpVersion, ResponseHead};
