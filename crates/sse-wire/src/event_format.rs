use crate::event::SseEvent;

/// Formats an event into its wire shape: `event:` / `id:` / `retry:` lines
/// when the fields are set, one `data:` line per payload line, and the blank
/// line that dispatches it. An empty payload still gets a lone `data:` line;
/// a strict decoder will drop such a frame, which makes it usable as a
/// keep-alive.
pub fn format_event(event: &SseEvent) -> String {
    let mut message = String::new();
    if let Some(event_type) = event.event.as_deref() {
        if !event_type.is_empty() {
            message.push_str("event:");
            message.push_str(event_type);
            message.push('\n');
        }
    }
    if let Some(id) = event.id.as_deref() {
        if !id.is_empty() {
            message.push_str("id:");
            message.push_str(id);
            message.push('\n');
        }
    }
    if let Some(retry_ms) = event.retry_ms {
        message.push_str("retry:");
        message.push_str(&retry_ms.to_string());
        message.push('\n');
    }
    if event.data.is_empty() {
        message.push_str("data:\n");
    } else {
        for segment in event.data.split('\n') {
            message.push_str("data:");
            message.push_str(segment);
            message.push('\n');
        }
    }
    message.push('\n');
    message
}

/// `:<text>` comment frame; never dispatchable by a decoder.
pub fn format_comment(comment: &str) -> String {
    format!(":{comment}\n\n")
}

/// Standalone reconnect-delay instruction.
pub fn format_retry(retry_ms: u64) -> String {
    format!("retry:{retry_ms}\n\n")
}
