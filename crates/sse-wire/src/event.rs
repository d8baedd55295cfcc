/// One dispatchable Server-Sent Event. The `data` payload is the
/// newline-join of every `data:` line seen for the event; `event`, `id` and
/// `retry_ms` stay `None` when the stream never set them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub id: Option<String>,
    pub retry_ms: Option<u64>,
    pub data: String,
}

impl SseEvent {
    pub fn message(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn typed(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            data: data.into(),
            ..Self::default()
        }
    }

    /// Event type as seen by a consumer; an unset type reads as "message".
    pub fn event_type(&self) -> &str {
        self.event.as_deref().unwrap_or("message")
    }

    /// An event reaches the consumer only when it carries data.
    pub fn is_dispatchable(&self) -> bool {
        !self.data.is_empty()
    }
}
