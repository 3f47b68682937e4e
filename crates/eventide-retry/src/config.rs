use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INTERVAL_MS: u64 = 500;
pub const DEFAULT_JITTER_MS: u64 = 100;

/// Retry bounds and timing.
///
/// Defaults: 5 retries, 500 ms base interval, up to 100 ms of jitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Ceiling on retries; 0 disables retrying
    pub max_retries: u32,
    /// Base delay, doubled per attempt
    pub interval_ms: u64,
    /// Upper bound of the random delay added to each backoff
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            interval_ms: DEFAULT_INTERVAL_MS,
            jitter_ms: DEFAULT_JITTER_MS,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter_ms = jitter.as_millis() as u64;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

/// Source of the random term added to exponential backoff
pub trait Jitter: Send + Sync + fmt::Debug {
    /// Sample a delay in `[0, bound)`; a zero bound yields zero
    fn sample(&self, bound: Duration) -> Duration;
}

/// Uniform jitter from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self, bound: Duration) -> Duration {
        let bound_ms = bound.as_millis() as u64;
        if bound_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..bound_ms))
    }
}

/// Deterministic jitter, capped at the bound
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub Duration);

impl Jitter for FixedJitter {
    fn sample(&self, bound: Duration) -> Duration {
        self.0.min(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.interval(), Duration::from_millis(500));
        assert_eq!(config.jitter(), Duration::from_millis(100));
    }

    #[test]
    fn test_builder() {
        let config = RetryConfig::new()
            .with_max_retries(0)
            .with_interval(Duration::from_secs(1))
            .with_jitter(Duration::ZERO);

        assert_eq!(config.max_retries, 0);
        assert_eq!(config.interval_ms, 1000);
        assert_eq!(config.jitter_ms, 0);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 2}"#).unwrap();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(config.jitter_ms, DEFAULT_JITTER_MS);
    }

    #[test]
    fn test_random_jitter_within_bound() {
        let bound = Duration::from_millis(100);
        for _ in 0..200 {
            assert!(RandomJitter.sample(bound) < bound);
        }
        assert_eq!(RandomJitter.sample(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_fixed_jitter_capped() {
        let jitter = FixedJitter(Duration::from_millis(250));
        assert_eq!(jitter.sample(Duration::from_millis(100)), Duration::from_millis(100));
        assert_eq!(jitter.sample(Duration::from_secs(1)), Duration::from_millis(250));
    }
}
