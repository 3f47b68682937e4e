use chrono::Utc;
use std::future::Future;

use crate::config::{Jitter, RetryConfig};
use crate::error::RequestError;
use crate::policy::{Outcome, RetryDecision, RetryPolicy};
use crate::response::RetryableResponse;

/// Re-issues a request until it succeeds, is declined for retry, or the
/// retry ceiling is reached.
///
/// Once `max_retries` retries are spent, one more request is issued
/// unconditionally and its result returned as-is. A call can therefore make
/// up to `max_retries + 2` requests; with `max_retries = 0` a failing call
/// makes exactly two. Callers rely on this count, so it is kept.
pub struct ResilientExecutor<R> {
    policy: RetryPolicy<R>,
}

impl<R: RetryableResponse + 'static> ResilientExecutor<R> {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            policy: RetryPolicy::new(config),
        }
    }
}

impl<R: RetryableResponse> ResilientExecutor<R> {
    pub fn from_policy(policy: RetryPolicy<R>) -> Self {
        Self { policy }
    }

    pub fn with_predicate(mut self, should_retry: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.policy = self.policy.with_predicate(should_retry);
        self
    }

    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.policy = self.policy.with_jitter(jitter);
        self
    }

    pub fn policy(&self) -> &RetryPolicy<R> {
        &self.policy
    }

    /// Run `request` under the retry policy
    pub async fn execute<F, Fut>(&self, mut request: F) -> Result<R, RequestError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, RequestError>>,
    {
        let mut attempts = 0u32;

        loop {
            let outcome = request().await;

            let decision = match &outcome {
                Ok(response) => self.policy.decide(Outcome::Response(response), attempts, Utc::now()),
                Err(error) => self.policy.decide(Outcome::Failure(error), attempts, Utc::now()),
            };

            let delay = match decision {
                RetryDecision::Return => return outcome,
                RetryDecision::Retry(delay) => delay,
            };

            if !self.policy.can_retry(attempts) {
                tracing::warn!(
                    "Retries exhausted after {} attempts, issuing final request",
                    attempts + 1
                );
                break;
            }

            match &outcome {
                Ok(response) => tracing::warn!(
                    "Request returned status {}, retrying in {:?} (retry {}/{})",
                    response.status(),
                    delay,
                    attempts + 1,
                    self.policy.config().max_retries
                ),
                Err(error) => tracing::warn!(
                    "Request failed: {}, retrying in {:?} (retry {}/{})",
                    error,
                    delay,
                    attempts + 1,
                    self.policy.config().max_retries
                ),
            }
            drop(outcome);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempts += 1;
        }

        request().await
    }
}

impl<R> Clone for ResilientExecutor<R> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ResilientExecutor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientExecutor")
            .field("policy", &self.policy)
            .finish()
    }
}

/// Run `request` with the default predicate, which never retries responses
pub async fn with_automatic_retries<R, F, Fut>(request: F, config: RetryConfig) -> Result<R, RequestError>
where
    R: RetryableResponse + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, RequestError>>,
{
    ResilientExecutor::new(config).execute(request).await
}
