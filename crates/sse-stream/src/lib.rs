mod client;
mod consumer;
mod errors;
mod writer;

pub use client::{drive_stream, drive_stream_with_timeout};
pub use consumer::{channel_observer, ChannelObserver, ClientUpdate};
pub use errors::ClientError;
pub use writer::{ChannelResponseStream, ResponseStream, SseWriter};

pub use sse_wire::{
    ResponseHead, SseClientContext, SseEvent, StreamObserver, StreamResult, TimeoutFlag,
};
