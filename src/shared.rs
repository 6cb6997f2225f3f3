//! Shared Cache Module
//!
//! A cloneable async handle to one [`TtlCache`], for use from many tasks.
//!
//! The whole lookup, compute, insert and evict sequence runs while holding
//! one lock, so concurrent misses on the same key run the computation once
//! and the store never grows by more than one entry per call.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheInfo, TtlCache};
use crate::config::CacheConfig;

// == Shared TTL Cache ==
/// Thread-safe handle to a [`TtlCache`].
///
/// Cloning the handle shares the underlying store and counters.
#[derive(Debug)]
pub struct SharedTtlCache<K, V> {
    inner: Arc<Mutex<TtlCache<K, V>>>,
}

impl<K, V> Clone for SharedTtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedTtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    pub fn new(maxsize: usize, ttl_secs: u64) -> Self {
        Self::from_cache(TtlCache::new(maxsize, ttl_secs))
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self::from_cache(TtlCache::with_config(config))
    }

    /// Wraps an existing cache, keeping its contents and counters.
    pub fn from_cache(cache: TtlCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key` or awaits `compute` and stores it.
    ///
    /// Other callers wait for the lock while `compute` runs.
    pub async fn get_or_compute<F, Fut>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        match self
            .try_get_or_compute(key, || async move {
                Ok::<V, std::convert::Infallible>(compute().await)
            })
            .await
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Try Get Or Compute ==
    /// Fallible form of [`get_or_compute`](Self::get_or_compute); errors are
    /// returned unchanged and nothing is stored.
    pub async fn try_get_or_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut cache = self.inner.lock().await;
        let now = Instant::now();

        if let Some(value) = cache.lookup(&key, now) {
            return Ok(value);
        }

        let value = compute().await?;
        cache.complete_miss(key, value.clone(), now);
        debug!(currsize = cache.len(), "shared cache miss stored");
        Ok(value)
    }

    // == Clear ==
    pub async fn clear(&self) -> CacheInfo {
        self.inner.lock().await.clear()
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheInfo {
        self.inner.lock().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
