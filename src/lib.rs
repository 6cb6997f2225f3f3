//! ttl_memo - A memoization cache bounded by size and time-to-live
//!
//! Remembers the results of a computation per argument set, retaining at
//! most `maxsize` results (oldest insertion evicted first) for at most `ttl`
//! seconds each. Expired results are dropped lazily, on the next lookup of
//! the same arguments.
//!
//! ```
//! use ttl_memo::{memoize, CacheConfig};
//!
//! let mut slow_add = memoize(CacheConfig::new(2, 5), |(a, b): &(u32, u32)| a + b);
//! assert_eq!(slow_add.call(&(1, 2))?, 3);
//! assert_eq!(slow_add.call(&(1, 2))?, 3);
//! assert_eq!(
//!     slow_add.cache_info(),
//!     "CacheInfo(hits=1, misses=1, maxsize=2, currsize=1, ttl=5)"
//! );
//! # Ok::<(), ttl_memo::CacheError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod memo;
pub mod shared;

pub use cache::{CacheInfo, TtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, CallError, Result};
pub use key::{CacheKey, KeyBuilder, KeyPart};
pub use memo::{memoize, Memoized};
pub use shared::SharedTtlCache;
