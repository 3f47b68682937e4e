//! Incremental decoding of `text/event-stream` responses.
//!
//! Bytes flow through a [`LineSplitter`] into an [`EventAssembler`], and
//! [`EventStream`] drives both over a reqwest response body, applying the
//! `error`/`done` termination rules.

pub mod assembler;
pub mod error;
pub mod event;
pub mod line_splitter;
pub mod stream;

pub use assembler::EventAssembler;
pub use error::{Result, StreamError};
pub use event::{ServerSentEvent, DONE_EVENT, ERROR_EVENT, OUTPUT_EVENT};
pub use line_splitter::LineSplitter;
pub use stream::{
    from_response, parse_event_stream, EventStream, EventStreamBox, StreamOptions,
    EVENT_STREAM_MIME,
};
