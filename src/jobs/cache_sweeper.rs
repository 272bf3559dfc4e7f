// ==================== CACHE SWEEPER ====================
// Background job that evicts expired cache entries on a fixed interval,
// independently of read traffic.

use crate::utils::cache::TtlCache;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Owned by `main`; call [`SweeperHandle::stop`] on shutdown.
pub struct SweeperHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to exit and waits for it.
    pub async fn stop(self) {
        let SweeperHandle { shutdown, task } = self;
        // The task may already be gone; nothing to signal then.
        let _ = shutdown.send(());
        if let Err(e) = task.await {
            log::warn!("⚠️  Cache sweeper ended abnormally: {}", e);
        }
    }
}

/// Spawns the sweeper. The first sweep runs one `every` after start.
pub fn start_cache_sweeper<V>(cache: TtlCache<V>, every: Duration) -> SweeperHandle
where
    V: Clone + Send + Sync + 'static,
{
    let every = every.max(Duration::from_millis(1));
    log::info!("🧹 Starting cache sweeper (every {}s)", every.as_secs());

    let (shutdown, mut stop_signal) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let Some(first_sweep) = Instant::now().checked_add(every) else {
            log::warn!("⚠️  Cache sweep interval is beyond the clock's range, sweeper idle until stopped");
            let _ = stop_signal.await;
            log::info!("🛑 Cache sweeper stopped");
            return;
        };
        let mut ticker = interval_at(first_sweep, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop_signal => {
                    log::info!("🛑 Cache sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let evicted = cache.sweep();
                    if evicted > 0 {
                        log::info!("🧹 Cache sweep evicted {} expired entries ({} remaining)", evicted, cache.len());
                    } else {
                        log::debug!("🧹 Cache sweep: nothing expired ({} entries)", cache.len());
                    }
                }
            }
        }
    });

    SweeperHandle { shutdown, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::cache::Expiration;

    #[tokio::test(start_paused = true)]
    async fn evicts_expired_entries_without_reads() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.set("short", 1, Expiration::After(Duration::from_secs(5)));
        cache.set("forever", 2, Expiration::Never);

        let sweeper = start_cache_sweeper(cache.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(10)).await;
        // Expired, but no sweep has run yet and nobody read it.
        assert_eq!(cache.len(), 2);

        tokio::time::sleep(Duration::from_secs(21)).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.get("forever"), Some(2));

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_sweeping_on_every_tick() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let sweeper = start_cache_sweeper(cache.clone(), Duration::from_secs(10));

        cache.set("a", 1, Expiration::After(Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(cache.is_empty());

        cache.set("b", 2, Expiration::After(Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 2);

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn interval_beyond_the_clock_range_idles_until_stopped() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1, Expiration::After(Duration::from_secs(1)));

        let sweeper = start_cache_sweeper(cache.clone(), Duration::from_secs(u64::MAX));
        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert_eq!(cache.len(), 1);
        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_task() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let sweeper = start_cache_sweeper(cache.clone(), Duration::from_secs(10));

        sweeper.stop().await;

        // No sweeper left to evict this.
        cache.set("a", 1, Expiration::After(Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(cache.len(), 1);
    }
}
