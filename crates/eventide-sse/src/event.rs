use serde::{Deserialize, Serialize};
use std::fmt;

/// Event name that carries renderable output
pub const OUTPUT_EVENT: &str = "output";

/// Event name that aborts the stream with its data as the message
pub const ERROR_EVENT: &str = "error";

/// Event name that ends the stream successfully
pub const DONE_EVENT: &str = "done";

/// A single decoded server-sent event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSentEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    /// All `data` lines of the event, joined with `\n`
    pub data: String,

    /// Last event id seen on the stream, carried over between events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Reconnection hint in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u64>,
}

impl ServerSentEvent {
    pub fn new(event: Option<String>, data: impl Into<String>, id: Option<String>) -> Self {
        Self {
            event,
            data: data.into(),
            id,
            retry: None,
        }
    }

    pub fn with_retry(mut self, retry: u64) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn is_output(&self) -> bool {
        self.name() == Some(OUTPUT_EVENT)
    }

    pub fn is_error(&self) -> bool {
        self.name() == Some(ERROR_EVENT)
    }

    pub fn is_done(&self) -> bool {
        self.name() == Some(DONE_EVENT)
    }
}

/// Renders `output` events as their data; every other event renders empty.
impl fmt::Display for ServerSentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_output() {
            f.write_str(&self.data)
        } else {
            Ok(())
        }
    }
}
