//! OBJECT IDENTIFIER value type

use crate::error::{BerError, BerResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest second arc allowed under the first arcs 0 and 1
pub const MAX_SECOND_ARC_UNDER_ROOT: u64 = 39;

/// Dotted decimal with at least two arcs
static DOTTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)+$").expect("dotted OID pattern is valid"));

/// ASN.1 OBJECT IDENTIFIER
///
/// An ordered sequence of non-negative arcs. A valid identifier has at least
/// two arcs, its first arc is 0, 1 or 2, and when the first arc is 0 or 1 the
/// second arc is at most 39. Values are immutable once constructed.
///
/// The human-facing form is dotted decimal, e.g. `"2.999.3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    arcs: Vec<u64>,
}

impl ObjectIdentifier {
    /// Create an object identifier from its arcs
    ///
    /// # Errors
    ///
    /// Returns `BerError::InvalidIdentifier` if:
    /// - fewer than two arcs are supplied
    /// - the first arc is greater than 2
    /// - the first arc is 0 or 1 and the second arc is greater than 39
    pub fn new(arcs: Vec<u64>) -> BerResult<Self> {
        if arcs.len() < 2 {
            return Err(BerError::InvalidIdentifier(format!(
                "at least 2 arcs required, got {}",
                arcs.len()
            )));
        }

        let (first, second) = (arcs[0], arcs[1]);
        if first > 2 {
            return Err(BerError::InvalidIdentifier(format!(
                "first arc must be 0, 1 or 2, got {}",
                first
            )));
        }
        if first < 2 && second > MAX_SECOND_ARC_UNDER_ROOT {
            return Err(BerError::InvalidIdentifier(format!(
                "second arc must be at most {} under first arc {}, got {}",
                MAX_SECOND_ARC_UNDER_ROOT, first, second
            )));
        }

        Ok(Self { arcs })
    }

    /// Create an object identifier from a slice of arcs
    pub fn from_slice(arcs: &[u64]) -> BerResult<Self> {
        Self::new(arcs.to_vec())
    }

    /// Parse an object identifier from dotted-decimal form
    ///
    /// # Errors
    ///
    /// Returns `BerError::InvalidIdentifier` for negative arcs, non-numeric
    /// arcs, fewer than two arcs, or arcs violating the range rules, and
    /// `BerError::ArcOverflow` for an arc that does not fit in 64 bits.
    pub fn from_dotted(s: &str) -> BerResult<Self> {
        if s.split('.').any(|part| part.starts_with('-')) {
            return Err(BerError::InvalidIdentifier(format!(
                "negative arc in \"{}\"",
                s
            )));
        }

        if !DOTTED.is_match(s) {
            return Err(BerError::InvalidIdentifier(format!(
                "expected dotted decimal with at least 2 arcs, got \"{}\"",
                s
            )));
        }

        let arcs = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| BerError::ArcOverflow(format!("arc {} does not fit in 64 bits", part)))
            })
            .collect::<BerResult<Vec<u64>>>()?;

        Self::new(arcs)
    }

    /// Get the arcs
    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// Consume the identifier, returning its arcs
    pub fn into_arcs(self) -> Vec<u64> {
        self.arcs
    }

    /// Number of arcs (always at least 2)
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Always `false` for a valid identifier
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Get the first arc (0, 1 or 2)
    pub fn root(&self) -> u64 {
        self.arcs[0]
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.arcs.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
            for arc in iter {
                write!(f, ".{}", arc)?;
            }
        }
        Ok(())
    }
}

impl FromStr for ObjectIdentifier {
    type Err = BerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dotted(s)
    }
}

impl TryFrom<Vec<u64>> for ObjectIdentifier {
    type Error = BerError;

    fn try_from(arcs: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(arcs)
    }
}

impl TryFrom<&[u64]> for ObjectIdentifier {
    type Error = BerError;

    fn try_from(arcs: &[u64]) -> Result<Self, Self::Error> {
        Self::from_slice(arcs)
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Self::from_dotted(&dotted).map_err(serde::de::Error::custom)
    }
}
