//! Breaker Module
//!
//! Circuit breaker over asynchronous operations: pass-through while
//! healthy, fast rejection while a failing dependency cools down, and a
//! single-trial probe for recovery.

mod breaker;
mod state;

// Re-export public types
pub use breaker::CircuitBreaker;
pub use state::{BreakerSnapshot, CircuitState};
