//! Configuration Module
//!
//! Handles cache sizing and lifetime settings, with optional loading from
//! environment variables.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default maximum number of retained entries.
pub const DEFAULT_MAXSIZE: usize = 128;

/// Default entry lifetime in seconds.
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Environment variable holding the maximum entry count.
pub const MAXSIZE_ENV: &str = "TTL_MEMO_MAXSIZE";

/// Environment variable holding the entry lifetime in seconds.
pub const TTL_ENV: &str = "TTL_MEMO_TTL";

/// Cache configuration parameters.
///
/// A zero `maxsize` or zero `ttl` yields a disabled cache: every call
/// recomputes and nothing is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache retains
    pub maxsize: usize,
    /// Lifetime of a cached entry in seconds, measured from insertion
    pub ttl: u64,
}

impl CacheConfig {
    /// Creates a config with explicit limits.
    pub fn new(maxsize: usize, ttl: u64) -> Self {
        Self { maxsize, ttl }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TTL_MEMO_MAXSIZE` - Maximum cache entries (default: 128)
    /// - `TTL_MEMO_TTL` - Entry lifetime in seconds (default: 600)
    ///
    /// Unset variables fall back to the defaults; set but unparsable values
    /// are rejected.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            maxsize: read_env(MAXSIZE_ENV, DEFAULT_MAXSIZE)?,
            ttl: read_env(TTL_ENV, DEFAULT_TTL_SECS)?,
        })
    }

    /// Returns true when the limits leave no room to store anything.
    pub fn is_disabled(&self) -> bool {
        self.maxsize == 0 || self.ttl == 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            maxsize: DEFAULT_MAXSIZE,
            ttl: DEFAULT_TTL_SECS,
        }
    }
}

fn read_env<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(CacheError::InvalidConfig(format!(
            "{} is not valid unicode",
            name
        ))),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        CacheError::InvalidConfig(format!(
            "{}={:?} is not a non-negative integer",
            name, raw
        ))
    })
}
