//! Key Module
//!
//! Derives cache keys from call arguments.
//!
//! A [`CacheKey`] holds positional arguments in call order and keyword
//! arguments as a name-sorted set, so keyword order never affects identity
//! while positional order always does.

mod part;
mod serializer;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{CacheError, Result};

pub use part::KeyPart;
pub use serializer::{to_key_part, KeyError, KeySerializer};

impl From<KeyError> for CacheError {
    fn from(err: KeyError) -> Self {
        CacheError::UnhashableKey(err.to_string())
    }
}

// == Cache Key ==
/// Identity of one call: its positional and keyword arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    positional: Vec<KeyPart>,
    keyword: BTreeMap<String, KeyPart>,
}

impl CacheKey {
    /// Starts an explicit key.
    pub fn builder() -> KeyBuilder {
        KeyBuilder::default()
    }

    // == From Args ==
    /// Derives a key from a whole argument value.
    ///
    /// - tuples and tuple structs spread into positional arguments
    /// - structs and string-keyed maps spread into keyword arguments
    /// - `()` is the empty argument list
    /// - anything else is a single positional argument
    pub fn from_args<A>(args: &A) -> Result<Self>
    where
        A: ?Sized + Serialize,
    {
        let part = to_key_part(args)?;
        Ok(Self::from_part(part))
    }

    fn from_part(part: KeyPart) -> Self {
        match part {
            KeyPart::Unit => Self::default(),
            KeyPart::Tuple(items) => Self {
                positional: items,
                keyword: BTreeMap::new(),
            },
            KeyPart::Struct { fields, .. } if !fields.is_empty() => Self {
                positional: Vec::new(),
                keyword: fields
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            },
            KeyPart::Map(entries) if entries.iter().all(|(k, _)| k.as_str().is_some()) => {
                let keyword = entries
                    .into_iter()
                    .filter_map(|(k, v)| match k {
                        KeyPart::Str(name) => Some((name, v)),
                        _ => None,
                    })
                    .collect();
                Self {
                    positional: Vec::new(),
                    keyword,
                }
            }
            other => Self {
                positional: vec![other],
                keyword: BTreeMap::new(),
            },
        }
    }

    pub fn positional(&self) -> &[KeyPart] {
        &self.positional
    }

    pub fn keyword(&self, name: &str) -> Option<&KeyPart> {
        self.keyword.get(name)
    }

    /// Keyword arguments sorted by name.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &KeyPart)> {
        self.keyword.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut first = true;
        for part in &self.positional {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", part)?;
            first = false;
        }
        for (name, part) in &self.keyword {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", name, part)?;
            first = false;
        }
        write!(f, ")")
    }
}

// == Key Builder ==
/// Builds a [`CacheKey`] one argument at a time.
///
/// ```
/// use ttl_memo::CacheKey;
///
/// let a = CacheKey::builder().kwarg("a", &1)?.kwarg("b", &2)?.build();
/// let b = CacheKey::builder().kwarg("b", &2)?.kwarg("a", &1)?.build();
/// assert_eq!(a, b);
/// # Ok::<(), ttl_memo::CacheError>(())
/// ```
#[derive(Debug, Default)]
pub struct KeyBuilder {
    key: CacheKey,
}

impl KeyBuilder {
    /// Appends a positional argument.
    pub fn arg<T>(mut self, value: &T) -> Result<Self>
    where
        T: ?Sized + Serialize,
    {
        self.key.positional.push(to_key_part(value)?);
        Ok(self)
    }

    /// Adds a keyword argument. Each name may be given once.
    pub fn kwarg<T>(mut self, name: &str, value: &T) -> Result<Self>
    where
        T: ?Sized + Serialize,
    {
        if self.key.keyword.contains_key(name) {
            return Err(CacheError::DuplicateArgument(name.to_string()));
        }
        let part = to_key_part(value)?;
        self.key.keyword.insert(name.to_string(), part);
        Ok(self)
    }

    pub fn build(self) -> CacheKey {
        self.key
    }
}
