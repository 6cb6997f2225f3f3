//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order eviction
//! and lazy TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::cache::{CacheEntry, CacheInfo, CacheStats, InsertionOrder};
use crate::config::CacheConfig;

// == TTL Cache ==
/// Memoization store bounded by entry count and entry lifetime.
///
/// Eviction is FIFO: when a new result would push the store past `maxsize`,
/// the oldest-inserted entry is dropped. Hits never reorder entries.
/// Expired entries are only noticed when their own key is looked up again,
/// so an expired entry that is never revisited still occupies a slot until
/// it is evicted or the cache is cleared.
///
/// A `maxsize` or `ttl` of zero disables storage: every lookup recomputes.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Insertion order tracker
    order: InsertionOrder<K>,
    /// Hit/miss counters
    stats: CacheStats,
    /// Maximum number of entries retained
    maxsize: usize,
    /// Lifetime of each entry
    ttl: Duration,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::with_config(&CacheConfig::default())
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `maxsize` entries for `ttl_secs`
    /// seconds each.
    pub fn new(maxsize: usize, ttl_secs: u64) -> Self {
        let config = CacheConfig::new(maxsize, ttl_secs);
        if config.is_disabled() {
            info!(maxsize, ttl_secs, "TTL cache created with storage disabled");
        } else {
            debug!(maxsize, ttl_secs, "TTL cache created");
        }

        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            maxsize,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.maxsize, config.ttl)
    }

    // == Get Or Compute ==
    /// Returns the cached result for `key`, or runs `compute` and stores its
    /// result.
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        match self.try_get_or_compute(key, || Ok::<V, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Try Get Or Compute ==
    /// Fallible form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// An error from `compute` is returned unchanged. Nothing is stored and
    /// the lookup is not counted, since it never completed.
    pub fn try_get_or_compute<F, E>(&mut self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let now = Instant::now();

        if let Some(value) = self.lookup(&key, now) {
            return Ok(value);
        }

        let result = compute()?;
        self.complete_miss(key, result.clone(), now);

        Ok(result)
    }

    // == Lookup ==
    /// Returns a live value and records a hit, or drops an expired entry.
    ///
    /// `now` must be the instant the call started; the same instant is
    /// passed to [`complete_miss`](Self::complete_miss).
    pub(crate) fn lookup(&mut self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;

        if entry.is_live(now) {
            let value = entry.value.clone();
            self.stats.record_hit();
            trace!(hits = self.stats.hits, "cache hit");
            return Some(value);
        }

        let seq = entry.seq;
        self.entries.remove(key);
        self.order.remove(seq);
        debug!(currsize = self.entries.len(), "expired entry removed on lookup");
        None
    }

    // == Complete Miss ==
    /// Stores a freshly computed value and records the miss.
    pub(crate) fn complete_miss(&mut self, key: K, value: V, now: Instant) {
        self.insert(key, value, now);
        self.stats.record_miss();
        trace!(misses = self.stats.misses, "cache miss");
    }

    // == Insert ==
    /// Stores a fresh entry at the newest position, then enforces maxsize.
    fn insert(&mut self, key: K, value: V, now: Instant) {
        if self.maxsize == 0 || self.ttl.is_zero() {
            return;
        }

        let seq = self.order.push_newest(key.clone());
        let entry = CacheEntry::new(value, now, self.ttl, seq);
        if let Some(previous) = self.entries.insert(key, entry) {
            // A key holds at most one position in the order index
            self.order.remove(previous.seq);
        }

        if self.entries.len() > self.maxsize {
            self.evict_oldest();
        }
    }

    // == Evict Oldest ==
    fn evict_oldest(&mut self) {
        if let Some((_, evicted)) = self.order.pop_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(
                evictions = self.stats.evictions,
                maxsize = self.maxsize,
                "evicted oldest entry"
            );
        }
    }

    // == Clear ==
    /// Empties the store and resets hit/miss counters.
    ///
    /// `maxsize` and `ttl` are preserved. Returns the post-clear snapshot.
    pub fn clear(&mut self) -> CacheInfo {
        let dropped = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.reset();
        info!(dropped, "cache cleared");
        self.stats()
    }

    // == Stats ==
    /// Returns a snapshot of counters and limits.
    ///
    /// `currsize` is read from the live store length.
    pub fn stats(&self) -> CacheInfo {
        CacheInfo {
            hits: self.stats.hits,
            misses: self.stats.misses,
            maxsize: self.maxsize as u64,
            currsize: self.entries.len() as u64,
            ttl: self.ttl.as_secs(),
        }
    }

    /// Number of entries evicted to respect `maxsize` since the last clear.
    pub fn evictions(&self) -> u64 {
        self.stats.evictions
    }

    // == Contains Live ==
    /// Checks whether `key` currently maps to a live entry.
    ///
    /// Does not count as a lookup and does not remove expired entries.
    pub fn contains_live(&self, key: &K) -> bool {
        let now = Instant::now();
        self.entries
            .get(key)
            .map(|entry| entry.is_live(now))
            .unwrap_or(false)
    }

    /// Remaining lifetime of the entry for `key`, if one is stored.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        self.entries
            .get(key)
            .map(|entry| entry.ttl_remaining(Instant::now()))
    }

    /// Keys in eviction order, oldest first.
    pub fn keys_oldest_first(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn maxsize(&self) -> usize {
        self.maxsize
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counted<'a>(calls: &'a Cell<u32>, value: u32) -> impl FnOnce() -> u32 + 'a {
        move || {
            calls.set(calls.get() + 1);
            value
        }
    }

    #[test]
    fn test_store_new() {
        let cache: TtlCache<u32, u32> = TtlCache::new(100, 300);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.maxsize(), 100);
        assert_eq!(cache.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_store_default_limits() {
        let cache: TtlCache<u32, u32> = TtlCache::default();
        let info = cache.stats();
        assert_eq!(info.maxsize, 128);
        assert_eq!(info.ttl, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_after_insert() {
        let mut cache = TtlCache::new(10, 60);
        let calls = Cell::new(0);

        assert_eq!(cache.get_or_compute("a", counted(&calls, 1)), 1);
        assert_eq!(cache.get_or_compute("a", counted(&calls, 2)), 1);

        assert_eq!(calls.get(), 1);
        let info = cache.stats();
        assert_eq!((info.hits, info.misses, info.currsize), (1, 1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_refreshes_entry() {
        let mut cache = TtlCache::new(10, 5);
        let calls = Cell::new(0);

        cache.get_or_compute(1, counted(&calls, 10));
        tokio::time::advance(Duration::from_secs(5)).await;

        assert!(!cache.contains_live(&1));
        assert_eq!(cache.get_or_compute(1, counted(&calls, 20)), 20);
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.ttl_remaining(&1), Some(Duration::from_secs(5)));

        let info = cache.stats();
        assert_eq!((info.hits, info.misses, info.currsize), (0, 2, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_reinsert_moves_to_newest() {
        let mut cache = TtlCache::new(2, 5);

        cache.get_or_compute("a", || 1);
        tokio::time::advance(Duration::from_secs(3)).await;
        cache.get_or_compute("b", || 2);
        tokio::time::advance(Duration::from_secs(3)).await;

        // "a" expired and is re-inserted behind "b"
        cache.get_or_compute("a", || 3);
        assert_eq!(cache.keys_oldest_first().copied().collect::<Vec<_>>(), vec!["b", "a"]);

        cache.get_or_compute("c", || 4);
        assert_eq!(cache.keys_oldest_first().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_fifo_eviction_ignores_hits() {
        let mut cache = TtlCache::new(3, 300);

        cache.get_or_compute("key1", || 1);
        cache.get_or_compute("key2", || 2);
        cache.get_or_compute("key3", || 3);

        // A hit does not protect key1 from eviction
        cache.get_or_compute("key1", || 0);
        cache.get_or_compute("key4", || 4);

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains_live(&"key1"));
        assert!(cache.contains_live(&"key2"));
        assert!(cache.contains_live(&"key3"));
        assert!(cache.contains_live(&"key4"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut cache = TtlCache::new(2, 5);
        let calls = Cell::new(0);

        cache.get_or_compute(1, counted(&calls, 1));
        cache.get_or_compute(2, counted(&calls, 2));
        assert_eq!(cache.stats().currsize, 2);

        cache.get_or_compute(1, counted(&calls, 1));
        cache.get_or_compute(3, counted(&calls, 3));
        assert_eq!(cache.stats().currsize, 2);
        assert!(!cache.contains_live(&1));

        cache.get_or_compute(1, counted(&calls, 1));

        let info = cache.stats();
        assert_eq!(info.hits, 1);
        assert_eq!(info.misses, 4);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_failed_computation_is_not_stored() {
        let mut cache: TtlCache<&str, u32> = TtlCache::new(10, 60);

        let result: Result<u32, String> =
            cache.try_get_or_compute("k", || Err("boom".to_string()));
        assert_eq!(result, Err("boom".to_string()));

        let info = cache.stats();
        assert_eq!((info.hits, info.misses, info.currsize), (0, 0, 0));

        let result: Result<u32, String> = cache.try_get_or_compute("k", || Ok(7));
        assert_eq!(result, Ok(7));
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_clear_resets_counters_keeps_config() {
        let mut cache = TtlCache::new(4, 30);

        cache.get_or_compute(1, || "one");
        cache.get_or_compute(1, || "one");
        cache.get_or_compute(2, || "two");

        let info = cache.clear();
        assert_eq!(info.hits, 0);
        assert_eq!(info.misses, 0);
        assert_eq!(info.currsize, 0);
        assert_eq!(info.maxsize, 4);
        assert_eq!(info.ttl, 30);
        assert_eq!(cache.stats(), info);
        assert_eq!(cache.evictions(), 0);
        assert!(cache.keys_oldest_first().next().is_none());
    }

    #[test]
    fn test_zero_maxsize_disables_storage() {
        let mut cache = TtlCache::new(0, 60);
        let calls = Cell::new(0);

        cache.get_or_compute("a", counted(&calls, 1));
        cache.get_or_compute("a", counted(&calls, 1));

        assert_eq!(calls.get(), 2);
        let info = cache.stats();
        assert_eq!((info.hits, info.misses, info.currsize), (0, 2, 0));
    }

    #[test]
    fn test_zero_ttl_disables_storage() {
        let mut cache = TtlCache::new(8, 0);
        let calls = Cell::new(0);

        cache.get_or_compute("a", counted(&calls, 1));
        cache.get_or_compute("a", counted(&calls, 1));

        assert_eq!(calls.get(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_ttl_stores_without_overflow() {
        let mut cache: TtlCache<u8, u8> = TtlCache::new(4, u64::MAX);
        let calls = Cell::new(0);

        assert_eq!(cache.get_or_compute(1, || 7), 7);
        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
        assert_eq!(
            cache.get_or_compute(1, || {
                calls.set(calls.get() + 1);
                8
            }),
            7
        );

        assert_eq!(calls.get(), 0);
        assert!(cache.contains_live(&1));
        let info = cache.stats();
        assert_eq!((info.hits, info.misses, info.currsize), (1, 1, 1));
        assert_eq!(info.ttl, u64::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_unvisited_entry_occupies_slot() {
        let mut cache = TtlCache::new(2, 5);

        cache.get_or_compute("stale", || 1);
        tokio::time::advance(Duration::from_secs(10)).await;
        cache.get_or_compute("fresh", || 2);

        // No sweep: the expired entry still counts toward currsize
        assert_eq!(cache.stats().currsize, 2);
        assert!(!cache.contains_live(&"stale"));

        cache.get_or_compute("newer", || 3);
        assert_eq!(cache.stats().currsize, 2);
        assert_eq!(
            cache.keys_oldest_first().copied().collect::<Vec<_>>(),
            vec!["fresh", "newer"]
        );
    }
}
