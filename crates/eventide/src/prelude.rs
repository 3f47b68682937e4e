//! Prelude module for convenient imports
//!
//! ```rust
//! use eventide::prelude::*;
//! ```

pub use crate::{
    open_with_retries, retry_idempotent, EventStream, EventStreamBox, RequestError,
    ResilientExecutor, RetryConfig, ServerSentEvent, StreamError, StreamOptions,
};
