//! Error types for the resilience toolkit
//!
//! Provides unified error handling using thiserror.
//!
//! Cache operations never fail, so the only error surface here belongs to
//! the circuit breaker and the keyed retry path. The wrapped operation's
//! own error type is carried through generically and never rewritten.

use thiserror::Error;

// == Resilience Error Enum ==
/// Failure of a call made through a [`CircuitBreaker`](crate::CircuitBreaker)
/// or [`RetryExecutor::execute_with_breaker`](crate::RetryExecutor::execute_with_breaker).
///
/// `E` is the wrapped operation's error type. Callers always see exactly one
/// concrete cause: either the breaker refused the call, the call timed out,
/// or the operation itself failed.
#[derive(Error, Debug)]
pub enum ResilienceError<E> {
    /// Call rejected without invoking the operation: the breaker is open.
    ///
    /// `retry_after_ms` is how long until the next trial call is permitted,
    /// suitable for retry-after guidance to callers.
    #[error("circuit breaker is open, next attempt permitted in {retry_after_ms}ms")]
    BreakerOpen { retry_after_ms: u64 },

    /// The operation did not settle within the configured call timeout.
    #[error("operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The operation itself failed; its error is passed through unchanged.
    #[error("{0}")]
    Operation(E),
}

impl<E> ResilienceError<E> {
    /// Returns true if the call was short-circuited by an open breaker.
    pub fn is_breaker_open(&self) -> bool {
        matches!(self, ResilienceError::BreakerOpen { .. })
    }

    /// Returns true if the call failed by exceeding the call timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResilienceError::Timeout { .. })
    }

    /// Returns the underlying operation error, if that is what failed.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            ResilienceError::Operation(inner) => Some(inner),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for breaker-wrapped calls.
pub type ResilienceResult<T, E> = std::result::Result<T, ResilienceError<E>>;
