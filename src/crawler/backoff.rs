//! Retry policy and backoff sleeping
//!
//! The fetcher never calls `tokio::time::sleep` directly. Backoff delays go
//! through a [`Sleeper`] so the attempt loop can be driven without waiting on
//! the wall clock.

use crate::config::ScraperConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Bounded retry policy with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per URL, including the first
    pub max_attempts: u32,

    /// Attempt `i` (zero-based) is followed by `base^i` seconds
    pub backoff_base_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_secs: 2,
        }
    }
}

impl RetryPolicy {
    /// Builds the policy described by the scraper configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_base_secs: config.backoff_base_secs,
        }
    }

    /// Attempts to make; never less than one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after the failed attempt with the given zero-based index
    ///
    /// With the default base of 2 this is 1s after the first attempt and 2s
    /// after the second.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        Duration::from_secs(self.backoff_base_secs.saturating_pow(attempt_index))
    }

    /// Returns true if another attempt follows the given zero-based index
    pub fn has_next(&self, attempt_index: u32) -> bool {
        attempt_index + 1 < self.attempts()
    }

    /// Sum of every backoff delay a fully failing URL goes through
    ///
    /// Saturates at `Duration::MAX` like [`RetryPolicy::delay_for`].
    pub fn total_backoff(&self) -> Duration {
        (0..self.attempts().saturating_sub(1))
            .map(|i| self.delay_for(i))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Source of backoff delays
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
