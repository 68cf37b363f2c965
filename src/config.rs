//! Configuration Module
//!
//! Handles loading and managing component configuration from environment
//! variables. Every knob has a stated default, so an empty environment
//! yields a fully working setup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::RetryPolicy;

// == Env Helpers ==
/// Reads and parses an environment variable, falling back to `default` when
/// the variable is unset or unparsable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Reads a millisecond-valued environment variable as a [`Duration`].
fn env_ms_or(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

// == Cache Configuration ==
/// Configuration for [`TtlCache`](crate::TtlCache).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold (at least 1)
    pub max_entries: usize,
    /// TTL applied to entries stored without an explicit TTL
    pub default_ttl: Duration,
    /// Interval between background sweeps of expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            default_ttl: Duration::from_millis(300_000),
            sweep_interval: Duration::from_millis(1_000),
        }
    }
}

// == Breaker Configuration ==
/// Configuration for [`CircuitBreaker`](crate::CircuitBreaker).
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures that trip the breaker open (at least 1)
    pub failure_threshold: u32,
    /// Maximum time a single wrapped call may take before it counts as failed
    pub call_timeout: Duration,
    /// Cooldown after opening before a trial call is permitted
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            call_timeout: Duration::from_millis(60_000),
            reset_timeout: Duration::from_millis(30_000),
        }
    }
}

// == Top-Level Configuration ==
/// Aggregate configuration for all three components.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// TTL/LRU cache settings
    pub cache: CacheConfig,
    /// Circuit breaker settings
    pub breaker: BreakerConfig,
    /// Default retry policy
    pub retry: RetryPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `CACHE_DEFAULT_TTL_MS` - Default entry TTL in ms (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in ms (default: 1000)
    /// - `BREAKER_FAILURE_THRESHOLD` - Failures before opening (default: 5)
    /// - `BREAKER_CALL_TIMEOUT_MS` - Per-call timeout in ms (default: 60000)
    /// - `BREAKER_RESET_TIMEOUT_MS` - Open cooldown in ms (default: 30000)
    /// - `RETRY_MAX_RETRIES` - Retries after the first attempt (default: 3)
    /// - `RETRY_INITIAL_DELAY_MS` - First backoff delay in ms (default: 1000)
    /// - `RETRY_MAX_DELAY_MS` - Backoff delay cap in ms (default: 30000)
    /// - `RETRY_BACKOFF_MULTIPLIER` - Backoff growth factor (default: 2.0)
    /// - `RETRY_JITTER` - Whether to jitter waits (default: false)
    pub fn from_env() -> Self {
        let cache_defaults = CacheConfig::default();
        let breaker_defaults = BreakerConfig::default();
        let retry_defaults = RetryPolicy::default();

        Self {
            cache: CacheConfig {
                max_entries: env_or("CACHE_MAX_ENTRIES", cache_defaults.max_entries).max(1),
                default_ttl: env_ms_or("CACHE_DEFAULT_TTL_MS", cache_defaults.default_ttl),
                sweep_interval: env_ms_or("CACHE_SWEEP_INTERVAL_MS", cache_defaults.sweep_interval),
            },
            breaker: BreakerConfig {
                failure_threshold: env_or(
                    "BREAKER_FAILURE_THRESHOLD",
                    breaker_defaults.failure_threshold,
                )
                .max(1),
                call_timeout: env_ms_or("BREAKER_CALL_TIMEOUT_MS", breaker_defaults.call_timeout),
                reset_timeout: env_ms_or(
                    "BREAKER_RESET_TIMEOUT_MS",
                    breaker_defaults.reset_timeout,
                ),
            },
            retry: RetryPolicy {
                max_retries: env_or("RETRY_MAX_RETRIES", retry_defaults.max_retries),
                initial_delay: env_ms_or("RETRY_INITIAL_DELAY_MS", retry_defaults.initial_delay),
                max_delay: env_ms_or("RETRY_MAX_DELAY_MS", retry_defaults.max_delay),
                backoff_multiplier: env_or(
                    "RETRY_BACKOFF_MULTIPLIER",
                    retry_defaults.backoff_multiplier,
                ),
                jitter: env_or("RETRY_JITTER", retry_defaults.jitter),
            },
        }
    }
}
