//! Cache Statistics Module
//!
//! Tracks hit/miss counters and produces read-only snapshots of cache state.

use std::fmt;

use serde::Serialize;

// == Cache Stats ==
/// Running hit/miss counters owned by a cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that ran the computation
    pub misses: u64,
    /// Entries dropped to respect the size bound
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Info ==
/// Read-only snapshot of a cache's counters and limits.
///
/// `maxsize` and `ttl` are fixed at construction; `currsize` is the live
/// store length at the moment the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    /// Number of lookups answered from the cache
    pub hits: u64,
    /// Number of lookups that invoked the computation
    pub misses: u64,
    /// Maximum number of retained entries
    pub maxsize: u64,
    /// Number of entries currently held, expired-but-unvisited ones included
    pub currsize: u64,
    /// Entry lifetime in seconds
    pub ttl: u64,
}

impl CacheInfo {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total completed lookups since construction or the last clear.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == JSON ==
    /// Renders the snapshot as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheInfo(hits={}, misses={}, maxsize={}, currsize={}, ttl={})",
            self.hits, self.misses, self.maxsize, self.currsize, self.ttl
        )
    }
}
