//! In-memory TTL cache shared by every request handler.
//!
//! Entries carry an absolute expiry instant. Expired entries are dropped
//! lazily on read and in bulk by [`TtlCache::sweep`], which the background
//! sweeper job calls on a fixed interval. Misses go through a single-flight
//! registry so concurrent callers for the same cold key share one retrieval.

use crate::utils::error::RetrievalError;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

/// Lifetime of an entry at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Use the cache's default TTL. A zero default TTL means no expiry.
    Default,
    Never,
    After(Duration),
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

type Flight<V> = Shared<BoxFuture<'static, Result<V, RetrievalError>>>;

/// Point-in-time counters, exposed on `/metrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Inner<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    in_flight: Mutex<HashMap<String, Flight<V>>>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Cheap to clone; clones share the same storage.
pub struct TtlCache<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                default_ttl,
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                evictions: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the value under `key` if it exists and has not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.inner.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    self.inner.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.inner.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Expired. Re-check under the write lock, a concurrent set may have refreshed it.
        let mut entries = self.inner.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            self.inner.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V, expiration: Expiration) {
        let entry = CacheEntry {
            value,
            expires_at: self.expires_at(expiration),
        };
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Removes `key` regardless of expiry. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Evicts every expired entry and returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.inner.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let evicted = before - entries.len();
        drop(entries);

        self.inner.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
        evicted
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            evictions: self.inner.evictions.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Returns the cached value for `key`, or runs `retrieve` and caches its
    /// successful result. Errors are returned to every waiter and never cached.
    pub async fn fetch_cached<F, Fut>(
        &self,
        key: &str,
        expiration: Expiration,
        retrieve: F,
    ) -> Result<V, RetrievalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, RetrievalError>> + Send + 'static,
    {
        self.fetch_with_aliases(key, expiration, retrieve, |_: &V| Vec::new())
            .await
    }

    /// Like [`fetch_cached`](Self::fetch_cached), but a fresh value is also
    /// stored under every key returned by `aliases`.
    ///
    /// `retrieve` is only called on a miss with no retrieval already in flight
    /// for `key`. The future it returns runs on its own task, so it completes
    /// and is cached even if every caller awaiting it is dropped.
    pub async fn fetch_with_aliases<F, Fut, A>(
        &self,
        key: &str,
        expiration: Expiration,
        retrieve: F,
        aliases: A,
    ) -> Result<V, RetrievalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, RetrievalError>> + Send + 'static,
        A: FnOnce(&V) -> Vec<String> + Send + 'static,
    {
        if let Some(value) = self.get(key) {
            log::debug!("📦 Cache hit: {}", key);
            return Ok(value);
        }

        let flight = {
            let mut in_flight = self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(flight) = in_flight.get(key) {
                log::debug!("⏳ Joining in-flight retrieval: {}", key);
                flight.clone()
            } else if let Some(value) = self.recheck(key) {
                // A flight for this key landed between our miss and taking the lock.
                return Ok(value);
            } else {
                log::debug!("🌐 Cache miss, retrieving: {}", key);
                let flight = self.start_flight(key.to_string(), expiration, retrieve(), aliases);
                in_flight.insert(key.to_string(), flight.clone());
                flight
            }
        };

        flight.await
    }

    fn start_flight<Fut, A>(
        &self,
        key: String,
        expiration: Expiration,
        pending: Fut,
        aliases: A,
    ) -> Flight<V>
    where
        Fut: Future<Output = Result<V, RetrievalError>> + Send + 'static,
        A: FnOnce(&V) -> Vec<String> + Send + 'static,
    {
        let cache = self.clone();
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let key = task_key;
            let result = pending.await;

            match &result {
                Ok(value) => {
                    let expires_at = cache.expires_at(expiration);
                    let extra_keys = aliases(value);
                    let mut entries = cache.inner.entries.write().unwrap_or_else(PoisonError::into_inner);
                    for alias in extra_keys {
                        entries.insert(
                            alias,
                            CacheEntry {
                                value: value.clone(),
                                expires_at,
                            },
                        );
                    }
                    entries.insert(
                        key.clone(),
                        CacheEntry {
                            value: value.clone(),
                            expires_at,
                        },
                    );
                }
                Err(e) => log::debug!("⚠️  Retrieval failed for {}: {}", key, e),
            }

            // Stored before deregistering, so a late caller finds the value.
            cache
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&key);

            result
        });

        let registry = self.clone();
        async move {
            task.await.unwrap_or_else(|e| {
                log::error!("❌ Retrieval task for {} did not complete: {}", key, e);
                // The task never reached its own deregistration.
                registry
                    .inner
                    .in_flight
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&key);
                Err(RetrievalError::Interrupted(e.to_string()))
            })
        }
        .boxed()
        .shared()
    }

    /// Second look after a miss already counted by `get`: counts a hit when the
    /// entry has appeared since, and never evicts.
    fn recheck(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let value = self
            .inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone());
        if value.is_some() {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    fn expires_at(&self, expiration: Expiration) -> Option<Instant> {
        match expiration {
            Expiration::Never => None,
            Expiration::Default if self.inner.default_ttl.is_zero() => None,
            // Past the clock's range means it never expires.
            Expiration::Default => Instant::now().checked_add(self.inner.default_ttl),
            Expiration::After(ttl) => Instant::now().checked_add(ttl),
        }
    }
}
