//! In-memory cache for successful API response bodies.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Monotonic time source so expiry can be driven by hand in tests.
pub trait Clock: Send + Sync + Debug {
    fn now_millis(&self) -> u64;
}

/// Clock backed by the tokio runtime clock, so paused test time applies.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Freshness class of a cached response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTtl {
    Search,
    Company,
    Quote,
    Filings,
}

impl CacheTtl {
    pub const fn duration(self) -> Duration {
        match self {
            Self::Search => Duration::from_secs(2 * 60),
            Self::Company => Duration::from_secs(10 * 60),
            Self::Quote => Duration::from_secs(60),
            Self::Filings => Duration::from_secs(30 * 60),
        }
    }
}

/// Per-request cache eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Cached(CacheTtl),
    Bypass,
}

impl CachePolicy {
    pub const fn ttl(self) -> Option<Duration> {
        match self {
            Self::Cached(class) => Some(class.duration()),
            Self::Bypass => None,
        }
    }
}

/// Client-wide override applied on top of each request's [`CachePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve fresh entries; on a miss, fetch and store.
    #[default]
    Use,
    /// Always fetch, then store the new body.
    Refresh,
    /// Always fetch; never read or write the cache.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        matches!(self, Self::Use | Self::Refresh)
    }
}

/// Hit/miss/eviction counters since the store was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    created_at: u64,
    ttl: u64,
}

impl CacheEntry {
    fn is_fresh(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) < self.ttl
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Shared response cache. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<tokio::sync::Mutex<CacheInner>>,
    clock: Arc<dyn Clock>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::default()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(CacheInner::default())),
            clock,
        }
    }

    /// Fresh body for `key`. A stale entry is removed and reported as absent.
    pub async fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now_millis();
        let mut store = self.inner.lock().await;

        let fresh = store.map.get(key).map(|entry| entry.is_fresh(now));
        match fresh {
            Some(true) => {
                store.stats.hits += 1;
                store.map.get(key).map(|entry| entry.body.clone())
            }
            Some(false) => {
                store.map.remove(key);
                store.stats.evictions += 1;
                store.stats.misses += 1;
                tracing::debug!(key, "evicted stale cache entry");
                None
            }
            None => {
                store.stats.misses += 1;
                None
            }
        }
    }

    /// Store `body` under `key`. A zero TTL stores nothing.
    pub async fn put(&self, key: impl Into<String>, body: impl Into<String>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let entry = CacheEntry {
            body: body.into(),
            created_at: self.clock.now_millis(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };
        self.inner.lock().await.map.insert(key.into(), entry);
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        self.inner.lock().await.map.remove(key).is_some()
    }

    /// Drop every entry whose key starts with `prefix`; returns how many went.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut store = self.inner.lock().await;
        let before = store.map.len();
        store.map.retain(|key, _| !key.starts_with(prefix));
        before - store.map.len()
    }

    pub async fn clear_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut store = self.inner.lock().await;
        let before = store.map.len();
        store.map.retain(|_, entry| entry.is_fresh(now));
        let removed = before - store.map.len();
        store.stats.evictions += removed as u64;
        removed
    }

    pub async fn clear(&self) {
        self.inner.lock().await.map.clear();
    }

    /// Entry count, including entries that expired but were not yet touched.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }
}
