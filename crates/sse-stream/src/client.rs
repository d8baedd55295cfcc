use std::time::Duration;

use sse_wire::{ParseError, SseClientContext, StreamObserver, StreamResult};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::ClientError;

const IO_CHUNK_SIZE: usize = 8 * 1024;

/// Pumps a response byte stream into the client context until the body ends
/// or the transport fails, reporting the close result to the observer
/// exactly once. The decoder itself never suspends; only the reads do.
pub async fn drive_stream<R, O>(
    mut stream: R,
    context: &mut SseClientContext<O>,
) -> Result<(), ClientError>
where
    R: AsyncRead + Unpin,
    O: StreamObserver,
{
    let mut read_buf = Vec::new();
    let mut chunk = [0_u8; IO_CHUNK_SIZE];
    loop {
        let read = match stream.read(&mut chunk).await {
            Ok(read) => read,
            Err(error) => {
                tracing::warn!(%error, "closing SSE stream after read failure");
                context.on_close(StreamResult::NetworkFailure);
                return Err(ClientError::Io(error));
            }
        };
        if read == 0 {
            tracing::debug!("SSE stream reached end of input");
            context.on_close(StreamResult::Ok);
            return Ok(());
        }

        read_buf.extend_from_slice(&chunk[..read]);
        if let Err(error) = context.parse(&mut read_buf) {
            if matches!(error, ParseError::Closed) {
                context.on_close(StreamResult::Ok);
                return Ok(());
            }
            tracing::warn!(%error, "closing SSE stream after protocol failure");
            context.on_close(StreamResult::BadResponse);
            return Err(ClientError::Parse(error));
        }
        if context.is_closed() {
            context.on_close(StreamResult::Ok);
            return Ok(());
        }
    }
}

/// Like [`drive_stream`] but with a whole-stream deadline. At the deadline
/// the shared timeout flag is set, so any events still decoded are
/// swallowed, and the close notification reports `Timeout`. A zero timeout
/// means no deadline.
pub async fn drive_stream_with_timeout<R, O>(
    stream: R,
    context: &mut SseClientContext<O>,
    timeout: Duration,
) -> Result<(), ClientError>
where
    R: AsyncRead + Unpin,
    O: StreamObserver,
{
    if timeout.is_zero() {
        return drive_stream(stream, context).await;
    }

    let timed_out = context.timeout_flag();
    let outcome = tokio::select! {
        result = drive_stream(stream, &mut *context) => Some(result),
        _ = tokio::time::sleep(timeout) => None,
    };
    match outcome {
        Some(result) => result,
        None => {
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "SSE stream deadline hit");
            timed_out.set();
            context.on_close(StreamResult::Timeout);
            Ok(())
        }
    }
}
