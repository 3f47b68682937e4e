//! Retry timing decisions.
//!
//! Whether a non-success response is worth retrying is up to the caller's
//! predicate; this module owns when the next attempt happens. A `Retry-After`
//! hint on a failure or a retried response wins over exponential backoff.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Jitter, RandomJitter, RetryConfig};
use crate::error::RequestError;
use crate::response::{never_retry, RetryableResponse};

/// Caller-supplied classification of non-success responses
pub type RetryPredicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Result of one request attempt, as seen by the policy
#[derive(Debug)]
pub enum Outcome<'a, R> {
    Response(&'a R),
    Failure(&'a RequestError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand the outcome back to the caller
    Return,
    /// Try again after the delay
    Retry(Duration),
}

pub struct RetryPolicy<R> {
    config: RetryConfig,
    should_retry: RetryPredicate<R>,
    jitter: Arc<dyn Jitter>,
}

impl<R: RetryableResponse + 'static> RetryPolicy<R> {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            should_retry: Arc::new(never_retry::<R>),
            jitter: Arc::new(RandomJitter),
        }
    }
}

impl<R: RetryableResponse> RetryPolicy<R> {
    pub fn with_predicate(mut self, should_retry: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.should_retry = Arc::new(should_retry);
        self
    }

    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Whether another retry fits within the configured ceiling
    pub fn can_retry(&self, attempts: u32) -> bool {
        attempts < self.config.max_retries
    }

    /// Decide what to do with an outcome after `attempts` completed retries.
    ///
    /// Failures are always retried; responses only when unsuccessful and the
    /// predicate agrees.
    pub fn decide(&self, outcome: Outcome<'_, R>, attempts: u32, now: DateTime<Utc>) -> RetryDecision {
        let hint = match outcome {
            Outcome::Response(response) => {
                if response.is_success() || !(self.should_retry)(response) {
                    return RetryDecision::Return;
                }
                response.retry_after()
            }
            Outcome::Failure(error) => error.retry_after(),
        };

        let delay = hint
            .and_then(|value| parse_retry_after(value, now))
            .unwrap_or_else(|| self.backoff(attempts));

        RetryDecision::Retry(delay)
    }

    /// `interval * 2^attempts` plus jitter
    pub fn backoff(&self, attempts: u32) -> Duration {
        let exponential = 2u64
            .checked_pow(attempts)
            .and_then(|factor| self.config.interval_ms.checked_mul(factor))
            .unwrap_or(u64::MAX);

        Duration::from_millis(exponential).saturating_add(self.jitter.sample(self.config.jitter()))
    }
}

impl<R> Clone for RetryPolicy<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            should_retry: Arc::clone(&self.should_retry),
            jitter: Arc::clone(&self.jitter),
        }
    }
}

impl<R> fmt::Debug for RetryPolicy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

/// Parse a `Retry-After` value into a delay from `now`.
///
/// Integer seconds first, then an HTTP date (RFC 2822) or RFC 3339 timestamp.
/// Dates in the past and negative seconds mean retry immediately. Returns None
/// when the value is neither.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<i64>() {
        return Some(Duration::from_secs(seconds.max(0) as u64));
    }

    let date = DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()?;

    let remaining = date.with_timezone(&Utc) - now;
    Some(remaining.to_std().unwrap_or(Duration::ZERO))
}
