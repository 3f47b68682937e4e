use std::fmt::Display;
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response};

use crate::assembler::EventAssembler;
use crate::error::{Result, StreamError};
use crate::event::ServerSentEvent;
use crate::line_splitter::LineSplitter;

pub const EVENT_STREAM_MIME: &str = "text/event-stream";

/// Boxed stream of decoded events
pub type EventStreamBox = Pin<Box<dyn Stream<Item = Result<ServerSentEvent>> + Send>>;

/// Request options for an event-stream resource.
///
/// `Accept: text/event-stream` is always sent and replaces any Accept header set here.
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the request for `url` on `client`
    pub fn request(&self, client: &Client, url: &str) -> RequestBuilder {
        let mut headers = self.headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM_MIME));

        let builder = client.request(self.method.clone(), url).headers(headers);

        match &self.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        }
    }
}

/// A single-pass stream of server-sent events from an HTTP resource.
///
/// Nothing is sent until the stream returned by [`EventStream::events`] is first
/// polled. A non-success status fails the stream with [`StreamError::Transport`];
/// no retry happens here.
pub struct EventStream {
    client: Client,
    url: String,
    options: StreamOptions,
}

impl EventStream {
    pub fn new(url: impl Into<String>, options: StreamOptions) -> Self {
        Self::with_client(Client::new(), url, options)
    }

    pub fn with_client(client: Client, url: impl Into<String>, options: StreamOptions) -> Self {
        Self {
            client,
            url: url.into(),
            options,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// Consume the stream handle and produce its events
    pub fn events(self) -> EventStreamBox {
        Box::pin(async_stream::stream! {
            tracing::debug!("Opening event stream: {} {}", self.options.method, self.url);

            let response = match self.options.request(&self.client, &self.url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Event stream request failed: {}", e);
                    yield Err(StreamError::Request(e));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                tracing::error!("Event stream rejected: status={}", status);
                yield Err(StreamError::Transport { status: status.as_u16() });
                return;
            }

            let mut events = from_response(response);
            while let Some(item) = events.next().await {
                yield item;
            }
        })
    }
}

/// Parse the body of an already opened response
pub fn from_response(response: Response) -> EventStreamBox {
    parse_event_stream(response.bytes_stream())
}

/// Parse any chunked byte source into events.
///
/// An `error` event fails the stream with its data as the message. A `done`
/// event is yielded and then ends the stream without reading further. When the
/// source ends, an unterminated accumulation is dropped, not flushed.
pub fn parse_event_stream<S, E>(byte_stream: S) -> EventStreamBox
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut splitter = LineSplitter::default();
        let mut assembler = EventAssembler::new();

        while let Some(chunk_result) = byte_chunks.next().await {
            let bytes = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("Event stream body failed: {}", e);
                    yield Err(StreamError::Body(e.to_string()));
                    return;
                }
            };

            splitter.extend(&bytes);

            while let Some(line) = splitter.next_line() {
                let Some(event) = assembler.feed(&line) else {
                    continue;
                };

                if event.is_error() {
                    tracing::error!("Error event received: {}", event.data);
                    yield Err(StreamError::Protocol(event.data));
                    return;
                }

                let done = event.is_done();
                tracing::debug!("Event received: {:?} ({} bytes)", event.event, event.data.len());
                yield Ok(event);

                if done {
                    tracing::debug!("Done event received, closing stream");
                    return;
                }
            }
        }

        // Only a blank line emits, so the trailing fragment can just update the accumulator
        if let Some(line) = splitter.finish().filter(|line| !line.is_empty()) {
            assembler.feed(&line);
        }
        assembler.discard_pending();
        tracing::debug!("Event stream ended without done event");
    })
}
