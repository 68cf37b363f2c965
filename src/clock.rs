//! Clock Abstraction
//!
//! Injectable time source so expiry and breaker-window decisions can be
//! tested against a virtual clock instead of the wall clock.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Clock Trait ==
/// Source of the current time in milliseconds.
///
/// Every component that compares "now" against a stored deadline reads it
/// through this trait. Production code uses [`SystemClock`]; tests inject a
/// [`ManualClock`] and advance it explicitly.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time in milliseconds.
    ///
    /// For [`SystemClock`] this is Unix-epoch milliseconds. Implementations
    /// only need to be monotonic relative to themselves.
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Wall-clock time in Unix-epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis() as u64
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Starts at zero and advances via [`ManualClock::advance`]. Cloning shares
/// the underlying instant, so a clone handed to a cache or breaker stays in
/// step with the copy the test keeps.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a manual clock starting at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manual clock starting at the given millisecond instant.
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now_ms
            .fetch_add(delta.as_millis() as u64, Ordering::SeqCst);
    }

    /// Moves the clock forward by `delta_ms` milliseconds.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
