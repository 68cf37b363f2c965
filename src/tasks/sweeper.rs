//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! Lazy expiry on read already keeps expired values from being returned;
//! the sweeper exists so untouched entries do not hold memory until the
//! next read happens to land on them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task loops forever, sleeping for `sweep_interval` between runs and
/// taking a write lock on the cache for each sweep.
///
/// # Arguments
/// * `cache` - Shared cache to sweep
/// * `sweep_interval` - Time between sweep runs
///
/// # Returns
/// A JoinHandle for the spawned task; abort it during shutdown.
pub fn spawn_sweep_task<V>(
    cache: Arc<RwLock<TtlCache<V>>>,
    sweep_interval: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = sweep_interval.as_millis() as u64, "starting TTL sweep task");

        loop {
            tokio::time::sleep(sweep_interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!(removed, "TTL sweep removed expired entries");
            } else {
                debug!("TTL sweep found no expired entries");
            }
        }
    })
}
