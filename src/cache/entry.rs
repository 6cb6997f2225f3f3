//! Cache Entry Module
//!
//! Defines the structure for individual memoized results with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A memoized result with its expiry instant and insertion sequence number.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored result
    pub value: V,
    /// Instant after which the entry no longer counts as live; None when the
    /// lifetime reaches past the clock's representable range
    pub expires_at: Option<Instant>,
    /// Insertion sequence number, used to locate the entry in eviction order
    pub seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stored at `now` that lives for `ttl`.
    ///
    /// A `ttl` too large to add to `now` yields an entry that never expires.
    pub fn new(value: V, now: Instant, ttl: Duration, seq: u64) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
            seq,
        }
    }

    // == Is Live ==
    /// Checks whether the entry is still usable at `now`.
    ///
    /// Boundary condition: the entry stops being live at the exact instant
    /// its TTL has fully elapsed.
    pub fn is_live(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, or zero once expired.
    /// An entry that never expires reports `Duration::MAX`.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        match self.expires_at {
            Some(expires_at) => expires_at.saturating_duration_since(now),
            None => Duration::MAX,
        }
    }
}
