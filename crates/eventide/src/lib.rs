//! # Eventide
//!
//! Client-side consumption of `text/event-stream` resources with resilient
//! request execution.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eventide::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = reqwest::Client::new();
//!     let executor = ResilientExecutor::<reqwest::Response>::new(RetryConfig::default())
//!         .with_predicate(retry_idempotent::<reqwest::Response>(reqwest::Method::GET));
//!
//!     let mut events = open_with_retries(
//!         &client,
//!         "https://api.example.com/predictions/abc/stream",
//!         &StreamOptions::default(),
//!         &executor,
//!     )
//!     .await?;
//!
//!     while let Some(event) = events.next().await {
//!         print!("{}", event?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`eventide-sse`**: chunk-boundary independent event-stream decoding
//! - **`eventide-retry`**: retry executor with `Retry-After` and exponential backoff
//!
//! ## License
//!
//! MIT

pub mod prelude;

use reqwest::{Client, Response};

pub use eventide_sse::{
    from_response, parse_event_stream, EventAssembler, EventStream, EventStreamBox, LineSplitter,
    ServerSentEvent, StreamError, StreamOptions, DONE_EVENT, ERROR_EVENT, EVENT_STREAM_MIME,
    OUTPUT_EVENT,
};

pub use eventide_retry::{
    never_retry, parse_retry_after, retry_idempotent, with_automatic_retries, FixedJitter, Jitter,
    Outcome, RandomJitter, RequestError, ResilientExecutor, RetryConfig, RetryDecision,
    RetryPolicy, RetryPredicate, RetryableResponse,
};

/// Open an event stream, retrying the initial request under `executor`.
///
/// Only establishing the connection is retried. Once a success status arrives
/// the body is decoded as-is; a stream that fails mid-body is not reopened.
/// A final non-success status becomes [`RequestError::Transport`] carrying the
/// response headers.
pub async fn open_with_retries(
    client: &Client,
    url: &str,
    options: &StreamOptions,
    executor: &ResilientExecutor<Response>,
) -> Result<EventStreamBox, RequestError> {
    tracing::debug!("Opening event stream with retries: {} {}", options.method, url);

    let response = executor
        .execute(|| async {
            options
                .request(client, url)
                .send()
                .await
                .map_err(RequestError::from)
        })
        .await?;

    if !response.status().is_success() {
        tracing::error!("Event stream rejected: status={}", response.status());
        return Err(RequestError::from_response(&response));
    }

    Ok(from_response(response))
}
