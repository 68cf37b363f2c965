//! Circuit Breaker Module
//!
//! Wraps an asynchronous operation and short-circuits calls once the
//! dependency has failed too often, giving it a cooldown window to recover.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::breaker::{BreakerSnapshot, CircuitState};
use crate::clock::{Clock, SystemClock};
use crate::config::BreakerConfig;
use crate::error::{ResilienceError, ResilienceResult};

// == Breaker Inner State ==
/// Mutable breaker state, guarded by a mutex.
///
/// The lock is only ever held for the duration of a state check or
/// transition, never across an await.
#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    /// When the breaker last transitioned to Open
    opened_at: Option<u64>,
    /// When the next trial call is permitted (Open), or when the current
    /// trial's lease expires (HalfOpen)
    next_attempt_at: Option<u64>,
}

// == Circuit Breaker ==
/// Fault-tolerance wrapper for calls to an unreliable dependency.
///
/// State machine:
/// - `Closed`: calls pass through; consecutive failures are counted and a
///   success resets the count. Reaching the failure threshold opens the
///   breaker.
/// - `Open`: calls fail immediately with
///   [`ResilienceError::BreakerOpen`] until the reset timeout elapses.
/// - `HalfOpen`: exactly one trial call is admitted; its outcome decides
///   whether the breaker closes again or re-opens. Calls arriving while the
///   trial is in flight are rejected as if the breaker were open. The trial
///   holds a lease of one reset timeout, so a trial whose future was
///   dropped mid-flight cannot wedge the breaker: once the lease lapses,
///   the next caller becomes the new trial.
///
/// Every admitted call is raced against the configured call timeout;
/// exceeding it counts as a failure. A timeout stops polling the wrapped
/// future, but a remote side effect already in flight may still complete on
/// the other side.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    clock: Arc<dyn Clock>,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    // == Constructors ==
    /// Creates a breaker using the wall clock.
    pub fn new(config: BreakerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a breaker reading time from `clock`.
    pub fn with_clock(config: BreakerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                opened_at: None,
                next_attempt_at: None,
            }),
        }
    }

    // == Execute ==
    /// Runs `operation` subject to the breaker's state and call timeout.
    ///
    /// Returns the operation's value on success. Fails with
    /// [`ResilienceError::BreakerOpen`] when short-circuited (the operation
    /// is not invoked), [`ResilienceError::Timeout`] when the call exceeds
    /// the timeout, or [`ResilienceError::Operation`] carrying the
    /// operation's own error.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> ResilienceResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Err(retry_after_ms) = self.admit() {
            return Err(ResilienceError::BreakerOpen { retry_after_ms });
        }

        match tokio::time::timeout(self.config.call_timeout, operation()).await {
            Ok(Ok(value)) => {
                self.record_success();
                Ok(value)
            }
            Ok(Err(error)) => {
                self.record_failure();
                Err(ResilienceError::Operation(error))
            }
            Err(_elapsed) => {
                self.record_failure();
                Err(ResilienceError::Timeout {
                    timeout_ms: self.config.call_timeout.as_millis() as u64,
                })
            }
        }
    }

    // == Admission ==
    /// Decides whether a call may proceed right now.
    ///
    /// Returns the milliseconds until the next permitted attempt when the
    /// call is rejected. Transitions Open -> HalfOpen when the cooldown has
    /// elapsed, admitting the caller as the single trial.
    fn admit(&self) -> Result<(), u64> {
        let now_ms = self.clock.now_ms();
        let mut inner = self.inner.lock();

        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let next = inner.next_attempt_at.unwrap_or(now_ms);
                if now_ms < next {
                    Err(next - now_ms)
                } else {
                    inner.state = CircuitState::HalfOpen;
                    inner.next_attempt_at =
                        Some(now_ms + self.config.reset_timeout.as_millis() as u64);
                    tracing::info!("circuit breaker entering half-open state");
                    Ok(())
                }
            }
            CircuitState::HalfOpen => {
                let lease_end = inner.next_attempt_at.unwrap_or(now_ms);
                if now_ms < lease_end {
                    // A trial is already in flight; reject concurrent callers.
                    Err(lease_end - now_ms)
                } else {
                    // The previous trial vanished without reporting.
                    inner.next_attempt_at =
                        Some(now_ms + self.config.reset_timeout.as_millis() as u64);
                    tracing::warn!("half-open trial lease lapsed, admitting a new trial");
                    Ok(())
                }
            }
        }
    }

    // == Outcome Recording ==
    fn record_success(&self) {
        let mut inner = self.inner.lock();
        if inner.state == CircuitState::HalfOpen {
            tracing::info!("circuit breaker closed after successful trial");
        }
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.opened_at = None;
        inner.next_attempt_at = None;
    }

    fn record_failure(&self) {
        let now_ms = self.clock.now_ms();
        let mut inner = self.inner.lock();
        inner.failure_count += 1;

        let reopen = match inner.state {
            CircuitState::HalfOpen => true,
            CircuitState::Closed => inner.failure_count >= self.config.failure_threshold,
            CircuitState::Open => false,
        };

        if reopen {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(now_ms);
            inner.next_attempt_at = Some(now_ms + self.config.reset_timeout.as_millis() as u64);
            tracing::warn!(
                failures = inner.failure_count,
                "circuit breaker opened"
            );
        }
    }

    // == Reset ==
    /// Administrative override: forces `Closed` with a zeroed failure
    /// count, independent of any timers.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.opened_at = None;
        inner.next_attempt_at = None;
        tracing::info!("circuit breaker manually reset");
    }

    // == Observability ==
    /// Returns the current state.
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Returns the failure count of the current window.
    pub fn failure_count(&self) -> u32 {
        self.inner.lock().failure_count
    }

    /// Returns a full snapshot: state, failure count, and next permitted
    /// attempt time.
    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.inner.lock();
        BreakerSnapshot::from_parts(
            inner.state,
            inner.failure_count,
            inner.opened_at,
            inner.next_attempt_at,
        )
    }
}
