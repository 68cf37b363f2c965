//! Retry Executor Module
//!
//! Bounded retries with exponential backoff around arbitrary asynchronous
//! operations, optionally composed with per-key circuit breakers.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::breaker::{BreakerSnapshot, CircuitBreaker};
use crate::clock::{Clock, SystemClock};
use crate::config::BreakerConfig;
use crate::error::ResilienceResult;
use crate::retry::{JitterSource, RetryPolicy, ThreadRngJitter};

// == Retry Executor ==
/// Runs operations with retry-and-backoff semantics.
///
/// The executor owns the circuit breakers used by
/// [`execute_with_breaker`](Self::execute_with_breaker), keyed by operation
/// identity and created lazily. Instances are caller-owned; nothing here is
/// global, so independent executors never share state.
///
/// Attempts within one call are strictly sequential. Independent calls are
/// fully independent apart from breaker state shared under the same key.
#[derive(Debug)]
pub struct RetryExecutor {
    /// Settings applied to each lazily created breaker
    breaker_config: BreakerConfig,
    /// Per-key breakers for `execute_with_breaker`
    breakers: Mutex<HashMap<String, Arc<CircuitBreaker>>>,
    /// Time source handed to created breakers
    clock: Arc<dyn Clock>,
    /// Random source for jittered waits
    jitter: Arc<dyn JitterSource>,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

impl RetryExecutor {
    // == Constructors ==
    /// Creates an executor using the wall clock and thread-local RNG.
    pub fn new(breaker_config: BreakerConfig) -> Self {
        Self::with_sources(
            breaker_config,
            Arc::new(SystemClock),
            Arc::new(ThreadRngJitter),
        )
    }

    /// Creates an executor with injected time and randomness, for
    /// deterministic tests.
    pub fn with_sources(
        breaker_config: BreakerConfig,
        clock: Arc<dyn Clock>,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        Self {
            breaker_config,
            breakers: Mutex::new(HashMap::new()),
            clock,
            jitter,
        }
    }

    // == Execute ==
    /// Attempts `operation`, retrying failed attempts per `policy`.
    ///
    /// Returns the first success. Once retries are exhausted, the most
    /// recent attempt's error is returned unchanged; no synthetic wrapper
    /// error is introduced.
    pub async fn execute<T, E, F, Fut>(&self, policy: &RetryPolicy, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.execute_with_hook(policy, operation, |_, _, _| {}).await
    }

    // == Execute With Hook ==
    /// Like [`execute`](Self::execute), invoking `on_retry(&error,
    /// retry_number, wait)` before each backoff sleep.
    ///
    /// `retry_number` is 1-based and `wait` is the actual (possibly
    /// jittered) duration about to be slept, which makes the hook a
    /// convenient place to record or log the backoff schedule.
    pub async fn execute_with_hook<T, E, F, Fut, H>(
        &self,
        policy: &RetryPolicy,
        mut operation: F,
        mut on_retry: H,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        H: FnMut(&E, u32, Duration),
    {
        let mut delay = policy.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= policy.max_retries {
                        tracing::error!(
                            attempts = attempt + 1,
                            error = %error,
                            "all retry attempts failed"
                        );
                        return Err(error);
                    }

                    let wait = self.wait_for(policy, delay);
                    tracing::warn!(
                        retry = attempt + 1,
                        max_retries = policy.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %error,
                        "operation failed, backing off"
                    );
                    on_retry(&error, attempt + 1, wait);

                    tokio::time::sleep(wait).await;
                    delay = policy.next_delay(delay);
                    attempt += 1;
                }
            }
        }
    }

    // == Execute With Circuit Breaker ==
    /// Retries `operation` per `policy`, wrapping every attempt in the
    /// circuit breaker registered under `key` (created on first use).
    ///
    /// Open-circuit rejections and timeouts consume attempts like any other
    /// failure; the final error is whatever the last attempt produced.
    pub async fn execute_with_breaker<T, E, F, Fut>(
        &self,
        policy: &RetryPolicy,
        key: &str,
        mut operation: F,
    ) -> ResilienceResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let breaker = self.breaker_for(key);
        let mut delay = policy.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            match breaker.execute(&mut operation).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= policy.max_retries {
                        tracing::error!(
                            key,
                            attempts = attempt + 1,
                            error = %error,
                            "all retry attempts failed"
                        );
                        return Err(error);
                    }

                    let wait = self.wait_for(policy, delay);
                    tracing::warn!(
                        key,
                        retry = attempt + 1,
                        max_retries = policy.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %error,
                        "operation failed, backing off"
                    );

                    tokio::time::sleep(wait).await;
                    delay = policy.next_delay(delay);
                    attempt += 1;
                }
            }
        }
    }

    // == Breaker Registry ==
    /// Returns the breaker for `key`, creating it on first use.
    fn breaker_for(&self, key: &str) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock();
        breakers
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(CircuitBreaker::with_clock(
                    self.breaker_config.clone(),
                    self.clock.clone(),
                ))
            })
            .clone()
    }

    /// Returns a snapshot of the breaker registered under `key`, if any
    /// call has created one.
    pub fn breaker_snapshot(&self, key: &str) -> Option<BreakerSnapshot> {
        self.breakers.lock().get(key).map(|b| b.snapshot())
    }

    /// Administrative reset of the breaker under `key`. Returns whether a
    /// breaker existed.
    pub fn reset_breaker(&self, key: &str) -> bool {
        match self.breakers.lock().get(key) {
            Some(breaker) => {
                breaker.reset();
                true
            }
            None => false,
        }
    }

    // == Wait Calculation ==
    /// The actual wait for a backoff step: the capped delay, plus uniform
    /// jitter in `[0, delay)` when the policy asks for it.
    fn wait_for(&self, policy: &RetryPolicy, delay: Duration) -> Duration {
        if policy.jitter {
            delay + self.jitter.jitter_within(delay)
        } else {
            delay
        }
    }
}
