//! Mini Resilience - A lightweight resilience toolkit
//!
//! Three independent, composable primitives for calling unreliable remote
//! operations without cascading failure, and for skipping redundant
//! recomputation:
//!
//! - [`TtlCache`]: bounded key-value store with per-entry expiry and
//!   least-recently-used eviction
//! - [`CircuitBreaker`]: wraps an async operation, short-circuiting calls
//!   once a failure threshold is exceeded
//! - [`RetryExecutor`]: bounded retries with exponential backoff, optional
//!   jitter, and optional per-key circuit breaker composition
//!
//! A typical flow wraps a remote call in the retry executor, keys a
//! circuit breaker by operation identity, and memoizes successful results
//! in the cache under a request fingerprint until the TTL elapses.

pub mod breaker;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod retry;
pub mod tasks;

pub use breaker::{BreakerSnapshot, CircuitBreaker, CircuitState};
pub use cache::{CacheStats, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BreakerConfig, CacheConfig, Config};
pub use error::{ResilienceError, ResilienceResult};
pub use retry::{FixedJitter, JitterSource, RetryExecutor, RetryPolicy, ThreadRngJitter};
pub use tasks::spawn_sweep_task;
