//! Jitter Source Module
//!
//! Randomness behind backoff jitter, injectable so tests stay
//! deterministic.

use std::fmt;
use std::time::Duration;

use rand::Rng;

// == Jitter Source Trait ==
/// Supplies the random extra wait added to a backoff delay.
pub trait JitterSource: Send + Sync + fmt::Debug {
    /// Returns a duration in `[0, upper)`. Must return zero when `upper`
    /// is zero.
    fn jitter_within(&self, upper: Duration) -> Duration;
}

// == Thread-RNG Jitter ==
/// Uniform jitter drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn jitter_within(&self, upper: Duration) -> Duration {
        let upper_ms = upper.as_millis() as u64;
        if upper_ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(0..upper_ms))
    }
}

// == Fixed Jitter ==
/// Always returns the same jitter, clamped below `upper`. For tests and
/// for callers that want predictable spacing.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl JitterSource for FixedJitter {
    fn jitter_within(&self, upper: Duration) -> Duration {
        if upper.is_zero() {
            return Duration::ZERO;
        }
        self.0.min(upper - Duration::from_millis(1).min(upper))
    }
}
