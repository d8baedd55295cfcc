use crate::event::SseEvent;

/// Incremental `text/event-stream` decoder.
///
/// Feed it byte chunks of any size; complete events come back as they are
/// terminated by a blank line. A trailing line without its terminator is
/// buffered across calls and an unterminated final event is never emitted:
/// the stream is treated as unbounded.
#[derive(Debug, Default)]
pub struct SseEventParser {
    pending_line: Vec<u8>,
    event: Option<String>,
    id: Option<String>,
    retry_ms: Option<u64>,
    data: String,
    last_event_id: Option<String>,
}

impl SseEventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut emitted = Vec::new();
        for byte in chunk {
            if *byte == b'\n' {
                self.process_completed_line(&mut emitted);
            } else {
                self.pending_line.push(*byte);
            }
        }
        emitted
    }

    /// Clears the pending accumulator and any buffered partial line so the
    /// parser can be reused across reconnects. The sticky last-event-id is
    /// kept: it is what a reconnect needs.
    pub fn reset(&mut self) {
        self.pending_line.clear();
        self.event = None;
        self.id = None;
        self.retry_ms = None;
        self.data.clear();
    }

    /// Most recently accepted `id` value. Persists across events that omit
    /// `id` and across `reset`.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn process_completed_line(&mut self, emitted: &mut Vec<SseEvent>) {
        let mut line = std::mem::take(&mut self.pending_line);
        trim_trailing_carriage_return(&mut line);
        if line.is_empty() {
            if let Some(event) = self.dispatch_event() {
                emitted.push(event);
            }
            return;
        }
        self.apply_line(&line);
    }

    fn apply_line(&mut self, line: &[u8]) {
        if line.first() == Some(&b':') {
            return;
        }
        let (field_bytes, value_bytes) = parse_field_line(line);
        let field = String::from_utf8_lossy(field_bytes);
        let value = String::from_utf8_lossy(value_bytes).into_owned();
        match field.as_ref() {
            "event" => {
                self.event = Some(value);
            }
            "data" => {
                if self.data.is_empty() {
                    self.data = value;
                } else {
                    self.data.push('\n');
                    self.data.push_str(&value);
                }
            }
            "id" => {
                if !value.contains('\0') {
                    self.id = Some(value.clone());
                    self.last_event_id = Some(value);
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit()) {
                    if let Ok(retry_ms) = value.parse::<u64>() {
                        self.retry_ms = Some(retry_ms);
                    }
                }
            }
            _ => {}
        }
    }

    fn dispatch_event(&mut self) -> Option<SseEvent> {
        let data = std::mem::take(&mut self.data);
        let event = self.event.take();
        let id = self.id.take();
        let retry_ms = self.retry_ms.take();
        if data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event: event.or_else(|| Some("message".to_string())),
            id,
            retry_ms,
            data,
        })
    }
}

fn trim_trailing_carriage_return(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
}

fn parse_field_line(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(separator_index) = line.iter().position(|byte| *byte == b':') {
        let field = &line[..separator_index];
        let mut value = &line[separator_index + 1..];
        if value.first() == Some(&b' ') {
            value = &value[1..];
        }
        (field, value)
    } else {
        (line, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::SseEventParser;

    #[test]
    fn parses_event_id_retry_and_multiline_data_across_chunks() {
        let mut parser = SseEventParser::new();
        let first = parser.push_bytes(b"event: update\nid: abc\nretry: 1500\ndata: line-1\nd");
        assert!(first.is_empty());

        let second = parser.push_bytes(b"ata: line-2\n\n");
        assert_eq!(second.len(), 1);
        let event = &second[0];
        assert_eq!(event.event.as_deref(), Some("update"));
        assert_eq!(event.id.as_deref(), Some("abc"));
        assert_eq!(event.retry_ms, Some(1500));
        assert_eq!(event.data, "line-1\nline-2");
    }

    #[test]
    fn blank_line_without_data_dispatches_nothing() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"event: update\nid: 7\n\ndata: real\n\n");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].data, "real");
        // The discarded accumulator did not leak its fields forward.
        assert_eq!(emitted[0].event.as_deref(), Some("message"));
        assert_eq!(emitted[0].id, None);
    }

    #[test]
    fn unterminated_trailing_event_is_never_emitted() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"data: committed\n\ndata: still pending\n");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].data, "committed");
    }

    #[test]
    fn missing_event_field_defaults_to_message() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"data: hi\n\n");
        assert_eq!(emitted[0].event.as_deref(), Some("message"));
        assert_eq!(emitted[0].event_type(), "message");
    }

    #[test]
    fn comment_lines_are_ignored() {
        let mut parser = SseEventParser::new();
        assert!(parser.push_bytes(b":heartbeat\n\n").is_empty());
        let emitted = parser.push_bytes(b":keep-alive\ndata: hi\n\n");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].data, "hi");
    }

    #[test]
    fn carriage_returns_are_stripped_from_line_ends() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"event: tick\r\ndata: 1\r\n\r\n");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].event.as_deref(), Some("tick"));
        assert_eq!(emitted[0].data, "1");
    }

    #[test]
    fn id_with_nul_byte_is_rejected_and_sticky_id_persists() {
        let mut parser = SseEventParser::new();
        let first = parser.push_bytes(b"id: alpha\ndata: 1\n\n");
        assert_eq!(first[0].id.as_deref(), Some("alpha"));
        assert_eq!(parser.last_event_id(), Some("alpha"));

        let second = parser.push_bytes(b"id: bad\0id\ndata: 2\n\n");
        assert_eq!(second[0].id, None);
        assert_eq!(parser.last_event_id(), Some("alpha"));

        let third = parser.push_bytes(b"data: 3\n\n");
        assert_eq!(third[0].id, None);
        assert_eq!(parser.last_event_id(), Some("alpha"));
    }

    #[test]
    fn retry_requires_all_ascii_digits() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"retry: 12a\ndata: x\n\nretry: 250\ndata: y\n\n");
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].retry_ms, None);
        assert_eq!(emitted[1].retry_ms, Some(250));
    }

    #[test]
    fn empty_retry_value_is_ignored() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"retry:\ndata: x\n\n");
        assert_eq!(emitted[0].retry_ms, None);
    }

    #[test]
    fn field_without_colon_is_a_name_with_empty_value() {
        let mut parser = SseEventParser::new();
        // "data" alone appends an empty segment; a later segment joins it.
        let emitted = parser.push_bytes(b"data: a\ndata\ndata: b\n\n");
        assert_eq!(emitted[0].data, "a\n\nb");
    }

    #[test]
    fn empty_leading_data_lines_do_not_dispatch_alone() {
        let mut parser = SseEventParser::new();
        assert!(parser.push_bytes(b"data:\n\n").is_empty());
        assert!(parser.push_bytes(b"data:\ndata:\n\n").is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored_without_aborting_the_event() {
        let mut parser = SseEventParser::new();
        let emitted = parser.push_bytes(b"custom: nope\ndata: kept\n\n");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].data, "kept");
    }

    #[test]
    fn reset_clears_pending_state_but_keeps_last_event_id() {
        let mut parser = SseEventParser::new();
        parser.push_bytes(b"id: 42\ndata: done\n\nevent: partial\ndata: half");
        parser.reset();
        assert_eq!(parser.last_event_id(), Some("42"));

        let emitted = parser.push_bytes(b"data: fresh\n\n");
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].event.as_deref(), Some("message"));
        assert_eq!(emitted[0].data, "fresh");
    }
}
