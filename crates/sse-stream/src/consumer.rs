use sse_wire::{ResponseHead, SseEvent, StreamObserver, StreamResult};
use tokio::sync::mpsc;

/// Everything a client stream produces, as owned values a consumer task can
/// await on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientUpdate {
    Headers(ResponseHead),
    Event(SseEvent),
    Closed {
        result: StreamResult,
        head: Option<ResponseHead>,
    },
}

/// Observer that forwards updates into an unbounded channel; the channel's
/// receiver side is the consumer's await point. Send failures are ignored:
/// a consumer that went away just stops caring.
#[derive(Debug)]
pub struct ChannelObserver {
    updates: mpsc::UnboundedSender<ClientUpdate>,
}

pub fn channel_observer() -> (ChannelObserver, mpsc::UnboundedReceiver<ClientUpdate>) {
    let (updates, receiver) = mpsc::unbounded_channel();
    (ChannelObserver { updates }, receiver)
}

impl StreamObserver for ChannelObserver {
    fn on_headers(&mut self, head: &ResponseHead) {
        let _ = self.updates.send(ClientUpdate::Headers(head.clone()));
    }

    fn on_event(&mut self, event: &SseEvent) {
        let _ = self.updates.send(ClientUpdate::Event(event.clone()));
    }

    fn on_close(&mut self, result: StreamResult, head: Option<&ResponseHead>) {
        let _ = self.updates.send(ClientUpdate::Closed {
            result,
            head: head.cloned(),
        });
    }
}
