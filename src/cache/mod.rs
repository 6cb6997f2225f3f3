//! Cache Module
//!
//! Provides the memoization store with TTL expiration and FIFO eviction.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub(crate) use order::InsertionOrder;
pub use stats::{CacheInfo, CacheStats};
pub use store::TtlCache;
