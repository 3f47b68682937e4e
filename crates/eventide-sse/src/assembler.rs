use crate::event::ServerSentEvent;

/// Separator between a field name and its value
const FIELD_SEPARATOR: &str = ": ";

/// Accumulator mutation selected by a recognized field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Event,
    Data,
    Id,
    Retry,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "event" => Some(Field::Event),
            "data" => Some(Field::Data),
            "id" => Some(Field::Id),
            "retry" => Some(Field::Retry),
            _ => None,
        }
    }
}

/// Assembles lines into events, one line at a time.
///
/// A blank line emits the accumulated event if an `event`, `data` or `id`
/// line arrived since the previous emission. Emission resets the name, data
/// and retry hint but keeps `id`, so the last event id carries into later
/// events until another `id:` line replaces it.
#[derive(Debug, Default)]
pub struct EventAssembler {
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
    retry: Option<u64>,
    accumulating: bool,
}

impl EventAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without terminator); returns an event when the line completes one
    pub fn feed(&mut self, line: &str) -> Option<ServerSentEvent> {
        if line.is_empty() {
            return self.emit();
        }

        if line.starts_with(':') {
            return None;
        }

        // Lines without the separator are tolerated and ignored
        let (name, value) = line.split_once(FIELD_SEPARATOR)?;

        match Field::from_name(name)? {
            Field::Event => {
                self.event = Some(value.to_string());
                self.accumulating = true;
            }
            Field::Data => {
                self.data.push(value.to_string());
                self.accumulating = true;
            }
            Field::Id => {
                self.id = Some(value.to_string());
                self.accumulating = true;
            }
            Field::Retry => {
                if let Ok(millis) = value.parse::<u64>() {
                    self.retry = Some(millis);
                }
            }
        }

        None
    }

    /// Whether a field line is waiting for its terminating blank line
    pub fn is_accumulating(&self) -> bool {
        self.accumulating
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Drop any partial accumulation at end of input. The persisted id survives.
    pub fn discard_pending(&mut self) {
        if self.accumulating {
            tracing::debug!(
                "Discarding unterminated event at end of stream ({} data lines)",
                self.data.len()
            );
        }
        self.event = None;
        self.data.clear();
        self.retry = None;
        self.accumulating = false;
    }

    fn emit(&mut self) -> Option<ServerSentEvent> {
        if !self.accumulating {
            return None;
        }

        let event = ServerSentEvent {
            event: self.event.take(),
            data: self.data.join("\n"),
            id: self.id.clone(),
            retry: self.retry.take(),
        };

        self.data.clear();
        self.accumulating = false;

        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(assembler: &mut EventAssembler, lines: &[&str]) -> Vec<ServerSentEvent> {
        lines.iter().filter_map(|line| assembler.feed(line)).collect()
    }

    #[test]
    fn test_named_event() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(&mut assembler, &["event: output", "data: hello", ""]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("output"));
        assert_eq!(events[0].data, "hello");
        assert_eq!(events[0].id, None);
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(&mut assembler, &["data: line1", "data: line2", ""]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line1\nline2");
        assert_eq!(events[0].event, None);
    }

    #[test]
    fn test_blank_line_without_fields_is_ignored() {
        let mut assembler = EventAssembler::new();
        assert!(assembler.feed("").is_none());

        let events = feed_all(&mut assembler, &["data: x", "", "", ""]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_comment_lines_ignored() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(&mut assembler, &[": keep-alive", ""]);
        assert!(events.is_empty());

        let events = feed_all(&mut assembler, &["data: a", ":comment: data: b", ""]);
        assert_eq!(events[0].data, "a");
    }

    #[test]
    fn test_id_carries_over_but_retry_resets() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(
            &mut assembler,
            &["id: 7", "retry: 3000", "data: first", "", "data: second", ""],
        );

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            ServerSentEvent::new(None, "first", Some("7".to_string())).with_retry(3000)
        );
        assert_eq!(events[1].id.as_deref(), Some("7"));
        assert_eq!(events[1].retry, None);
        assert_eq!(assembler.last_event_id(), Some("7"));
    }

    #[test]
    fn test_id_replaced_by_later_id_line() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(&mut assembler, &["id: 1", "", "id: 2", "data: x", ""]);

        assert_eq!(events[0].id.as_deref(), Some("1"));
        assert_eq!(events[0].data, "");
        assert_eq!(events[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_retry_alone_does_not_emit() {
        let mut assembler = EventAssembler::new();
        assert!(feed_all(&mut assembler, &["retry: 10", ""]).is_empty());
        assert!(!assembler.is_accumulating());
    }

    #[test]
    fn test_malformed_lines_tolerated() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(
            &mut assembler,
            &["data:nospace", "garbage", "unknown: field", "retry: soon", "data: ok", ""],
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "ok");
        assert_eq!(events[0].retry, None);
    }

    #[test]
    fn test_value_split_on_first_separator() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(&mut assembler, &["data: key: value", ""]);
        assert_eq!(events[0].data, "key: value");
    }

    #[test]
    fn test_empty_data_value() {
        let mut assembler = EventAssembler::new();
        let events = feed_all(&mut assembler, &["data: ", ""]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "");
    }

    #[test]
    fn test_discard_pending_keeps_id() {
        let mut assembler = EventAssembler::new();
        feed_all(&mut assembler, &["id: 9", "data: dangling"]);
        assert!(assembler.is_accumulating());

        assembler.discard_pending();
        assert!(!assembler.is_accumulating());
        assert_eq!(assembler.last_event_id(), Some("9"));
        assert!(assembler.feed("").is_none());
    }
}
