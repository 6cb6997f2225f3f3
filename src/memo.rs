//! Memoized Function Module
//!
//! Wraps a function together with the [`TtlCache`] that remembers its
//! results. The wrapper is an ordinary value: construct it once and hand it
//! (or a reference to it) to the call sites that should share its cache.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheInfo, TtlCache};
use crate::config::CacheConfig;
use crate::error::{CallError, Result};
use crate::key::CacheKey;

// == Memoize ==
/// Wraps `func` in a cache built from `config`.
///
/// ```
/// use ttl_memo::{memoize, CacheConfig};
///
/// let mut square = memoize(CacheConfig::new(2, 5), |n: &u64| n * n);
/// assert_eq!(square.call(&4)?, 16);
/// assert_eq!(square.call(&4)?, 16);
/// assert_eq!(square.stats().hits, 1);
/// # Ok::<(), ttl_memo::CacheError>(())
/// ```
pub fn memoize<A, V, F>(config: CacheConfig, func: F) -> Memoized<A, V, F>
where
    A: ?Sized + Serialize,
    V: Clone,
{
    Memoized::new(config, func)
}

// == Memoized ==
/// A function paired with its own result cache.
///
/// Arguments are turned into a [`CacheKey`] with [`CacheKey::from_args`]:
/// pass a tuple for positional arguments or a struct for keyword-style
/// arguments.
pub struct Memoized<A: ?Sized, V, F> {
    func: F,
    cache: TtlCache<CacheKey, V>,
    _args: PhantomData<fn(&A)>,
}

impl<A, V, F> Memoized<A, V, F>
where
    A: ?Sized + Serialize,
    V: Clone,
{
    // == Constructor ==
    pub fn new(config: CacheConfig, func: F) -> Self {
        Self {
            func,
            cache: TtlCache::with_config(&config),
            _args: PhantomData,
        }
    }

    /// Wraps `func` with the default limits (128 entries, 600 seconds).
    pub fn with_defaults(func: F) -> Self {
        Self::new(CacheConfig::default(), func)
    }

    // == Call ==
    /// Returns the remembered result for `args`, calling the function on a
    /// miss.
    ///
    /// Fails only when `args` cannot be turned into a key, in which case the
    /// function is not called.
    pub fn call(&mut self, args: &A) -> Result<V>
    where
        F: FnMut(&A) -> V,
    {
        let key = CacheKey::from_args(args)?;
        let func = &mut self.func;
        Ok(self.cache.get_or_compute(key, || func(args)))
    }

    // == Try Call ==
    /// Like [`call`](Self::call) for functions returning `Result`.
    ///
    /// A function error comes back as [`CallError::Compute`] and nothing is
    /// cached for those arguments.
    pub fn try_call<E>(&mut self, args: &A) -> std::result::Result<V, CallError<E>>
    where
        F: FnMut(&A) -> std::result::Result<V, E>,
    {
        let key = CacheKey::from_args(args)?;
        let func = &mut self.func;
        self.cache
            .try_get_or_compute(key, || func(args))
            .map_err(|err| {
                debug!("memoized computation failed; nothing cached");
                CallError::Compute(err)
            })
    }

    // == Clear ==
    /// Empties the cache and resets its counters; returns the new snapshot.
    pub fn clear(&mut self) -> CacheInfo {
        self.cache.clear()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheInfo {
        self.cache.stats()
    }

    /// Formatted snapshot, e.g.
    /// `CacheInfo(hits=1, misses=4, maxsize=2, currsize=2, ttl=5)`.
    pub fn cache_info(&self) -> String {
        self.cache.stats().to_string()
    }

    /// The underlying cache, for inspection.
    pub fn cache(&self) -> &TtlCache<CacheKey, V> {
        &self.cache
    }
}

impl<A: ?Sized, V, F> fmt::Debug for Memoized<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("func", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde::Serialize;
    use std::cell::Cell;

    #[derive(Serialize)]
    struct Search<'a> {
        term: &'a str,
        page: u32,
    }

    #[test]
    fn test_call_hits_after_first() {
        let calls = Cell::new(0);
        let mut add = memoize(CacheConfig::new(8, 60), |(a, b): &(i32, i32)| {
            calls.set(calls.get() + 1);
            a + b
        });

        assert_eq!(add.call(&(1, 2)).unwrap(), 3);
        assert_eq!(add.call(&(1, 2)).unwrap(), 3);
        assert_eq!(add.call(&(2, 1)).unwrap(), 3);

        assert_eq!(calls.get(), 2);
        let info = add.stats();
        assert_eq!((info.hits, info.misses, info.currsize), (1, 2, 2));
    }

    #[test]
    fn test_keyword_style_arguments() {
        let calls = Cell::new(0);
        let mut search = Memoized::with_defaults(|query: &Search<'_>| {
            calls.set(calls.get() + 1);
            format!("{}#{}", query.term, query.page)
        });

        search.call(&Search { term: "rust", page: 1 }).unwrap();
        search.call(&Search { term: "rust", page: 1 }).unwrap();
        search.call(&Search { term: "rust", page: 2 }).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_try_call_propagates_error_verbatim() {
        let mut parse = memoize(CacheConfig::default(), |raw: &str| raw.parse::<u32>());

        let err = parse.try_call("nope").unwrap_err();
        assert!(matches!(err, CallError::Compute(_)));
        assert_eq!(parse.stats().currsize, 0);
        assert_eq!(parse.stats().misses, 0);

        assert_eq!(parse.try_call("42").unwrap(), 42);
        assert_eq!(parse.try_call("42").unwrap(), 42);
        assert_eq!(parse.stats().hits, 1);
    }

    #[test]
    fn test_unhashable_argument_skips_function() {
        struct Socket;

        impl Serialize for Socket {
            fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("socket"))
            }
        }

        let calls = Cell::new(0);
        let mut probe = memoize(CacheConfig::default(), |_: &Socket| {
            calls.set(calls.get() + 1);
        });

        let err = probe.call(&Socket).unwrap_err();
        assert!(matches!(err, CacheError::UnhashableKey(_)));
        assert_eq!(calls.get(), 0);
        assert_eq!(probe.stats().lookups(), 0);
    }

    #[test]
    fn test_clear_and_cache_info() {
        let mut double = memoize(CacheConfig::new(2, 5), |n: &u32| n * 2);

        for n in [1, 2, 1, 3, 1] {
            double.call(&n).unwrap();
        }
        assert_eq!(
            double.cache_info(),
            "CacheInfo(hits=1, misses=4, maxsize=2, currsize=2, ttl=5)"
        );

        let info = double.clear();
        assert_eq!(
            info.to_string(),
            "CacheInfo(hits=0, misses=0, maxsize=2, currsize=0, ttl=5)"
        );
        assert!(double.cache().is_empty());
    }
}
