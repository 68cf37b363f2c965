//! Breaker State Module
//!
//! State enum and observability snapshot for the circuit breaker.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Circuit State ==
/// The three circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CircuitState {
    /// Normal operation; calls pass through
    Closed,
    /// Failure threshold exceeded; calls are rejected until the cooldown ends
    Open,
    /// A single trial call is in flight to probe for recovery
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

// == Breaker Snapshot ==
/// Read-only view of a breaker's current state, for observability.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    /// Current state
    pub state: CircuitState,
    /// Failures observed in the current window
    pub failure_count: u32,
    /// When the breaker last transitioned to Open; None while closed
    pub opened_at: Option<DateTime<Utc>>,
    /// When the next trial call is permitted; None while closed
    pub next_attempt_at: Option<DateTime<Utc>>,
}

impl BreakerSnapshot {
    /// Converts clock milliseconds into the snapshot timestamps.
    ///
    /// Meaningful as wall-clock time under `SystemClock`; under a manual
    /// clock they are simply milliseconds from the clock's origin.
    pub(crate) fn from_parts(
        state: CircuitState,
        failure_count: u32,
        opened_at_ms: Option<u64>,
        next_attempt_at_ms: Option<u64>,
    ) -> Self {
        Self {
            state,
            failure_count,
            opened_at: opened_at_ms
                .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64)),
            next_attempt_at: next_attempt_at_ms
                .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64)),
        }
    }
}
