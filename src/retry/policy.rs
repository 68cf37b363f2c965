//! Retry Policy Module
//!
//! Bounded-retry settings and the exponential backoff progression.

use std::time::Duration;

// == Retry Policy ==
/// Settings for one retry loop.
///
/// `max_retries` counts retries after the first attempt, so `0` means
/// exactly one attempt with no waits. `backoff_multiplier` is expected to
/// be greater than 1; delays grow by that factor per retry and are capped
/// at `max_delay`.
///
/// When `jitter` is enabled, a uniform random extra wait in
/// `[0, delay)` is added on top of the capped delay, so a single wait can
/// exceed `max_delay` by less than one delay step. The random source is
/// injectable via [`JitterSource`](crate::retry::JitterSource).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Cap on the growing backoff delay
    pub max_delay: Duration,
    /// Multiplicative growth factor per retry
    pub backoff_multiplier: f64,
    /// Whether to add random jitter to each wait
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(30_000),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Returns the delay following `delay` in the backoff progression:
    /// `min(delay * backoff_multiplier, max_delay)`.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        let scaled_ms = delay.as_millis() as f64 * self.backoff_multiplier;
        let capped_ms = scaled_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms as u64)
    }

    /// Returns the waits a run of this policy would use if every attempt
    /// failed: one entry per retry, starting at `initial_delay`.
    pub fn delay_schedule(&self) -> Vec<Duration> {
        let mut schedule = Vec::with_capacity(self.max_retries as usize);
        let mut delay = self.initial_delay;
        for _ in 0..self.max_retries {
            schedule.push(delay);
            delay = self.next_delay(delay);
        }
        schedule
    }
}
