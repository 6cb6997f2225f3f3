//! Key Part Module
//!
//! A hashable, totally ordered mirror of any serializable argument value.

/// One lowered argument value.
///
/// Produced by serializing an argument through
/// [`KeySerializer`](super::KeySerializer). Floats are stored as bit
/// patterns so every `KeyPart` is `Eq + Hash + Ord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Unit,
    Bool(bool),
    /// Any integer that fits in an `i128`
    Int(i128),
    /// A `u128` above `i128::MAX`
    BigUint(u128),
    /// Canonical `f64` bits, see [`KeyPart::float`]
    Float(u64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Option(Option<Box<KeyPart>>),
    /// Sequences of unknown arity (`Vec`, slices, sets)
    Seq(Vec<KeyPart>),
    /// Fixed-arity tuples and tuple structs
    Tuple(Vec<KeyPart>),
    /// Map entries, sorted by key
    Map(Vec<(KeyPart, KeyPart)>),
    Struct {
        name: &'static str,
        fields: Vec<(&'static str, KeyPart)>,
    },
    Variant {
        name: &'static str,
        variant: &'static str,
        value: Box<KeyPart>,
    },
}

impl KeyPart {
    /// Lowers a float, folding `-0.0` onto `0.0` and every NaN onto one NaN.
    pub fn float(value: f64) -> Self {
        let canonical = if value.is_nan() {
            f64::NAN
        } else if value == 0.0 {
            0.0
        } else {
            value
        };
        KeyPart::Float(canonical.to_bits())
    }

    /// Builds a map part with entries in a deterministic order.
    pub fn map(mut entries: Vec<(KeyPart, KeyPart)>) -> Self {
        entries.sort();
        KeyPart::Map(entries)
    }

    /// Returns the string payload, if this part is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            KeyPart::Str(s) => Some(s),
            _ => None,
        }
    }
}
