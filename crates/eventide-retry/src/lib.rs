//! Resilient request execution.
//!
//! [`ResilientExecutor`] wraps any request-issuing closure, retrying failures
//! after a delay from [`RetryPolicy`]: the server's `Retry-After` hint when
//! present, otherwise exponential backoff with jitter.

pub mod config;
pub mod error;
pub mod executor;
pub mod policy;
pub mod response;

pub use config::{FixedJitter, Jitter, RandomJitter, RetryConfig};
pub use error::RequestError;
pub use executor::{with_automatic_retries, ResilientExecutor};
pub use policy::{parse_retry_after, Outcome, RetryDecision, RetryPolicy, RetryPredicate};
pub use response::{never_retry, retry_idempotent, RetryableResponse};
