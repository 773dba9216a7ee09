//! Bijective raw ↔ sanitized name tables.
//!
//! A [`NameMap`] holds one naming scope: the fields of an object type, the
//! arguments of an operation, or the items of an enum. Both directions are
//! hash lookups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an insertion would break the one-to-one mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("name conflict: raw '{raw}' and sanitized '{sanitized}' are already mapped elsewhere")]
pub struct NameConflict {
    pub raw: String,
    pub sanitized: String,
}

/// An insertion-ordered bijection between raw and sanitized names.
///
/// ## Examples
///
/// ```
/// use swagql_runtime::NameMap;
///
/// let map = NameMap::from_pairs([
///     ("is-nick-name", "isNickName"),
///     ("5 Things are Neato!", "_5ThingsAreNeato"),
/// ]).unwrap();
///
/// assert_eq!(map.raw("isNickName"), Some("is-nick-name"));
/// assert_eq!(map.sanitized("5 Things are Neato!"), Some("_5ThingsAreNeato"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<(String, String)>", try_from = "Vec<(String, String)>")]
pub struct NameMap {
    by_raw: IndexMap<String, String>,
    by_sanitized: IndexMap<String, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(raw, sanitized)` pairs.
    pub fn from_pairs<R, S>(pairs: impl IntoIterator<Item = (R, S)>) -> Result<Self, NameConflict>
    where
        R: Into<String>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (raw, sanitized) in pairs {
            map.insert(raw, sanitized)?;
        }
        Ok(map)
    }

    /// Adds a pair.
    ///
    /// Re-inserting an identical pair is a no-op; mapping either side to a
    /// different partner is a [`NameConflict`].
    pub fn insert(
        &mut self,
        raw: impl Into<String>,
        sanitized: impl Into<String>,
    ) -> Result<(), NameConflict> {
        let raw = raw.into();
        let sanitized = sanitized.into();

        match (self.by_raw.get(&raw), self.by_sanitized.get(&sanitized)) {
            (None, None) => {
                self.by_raw.insert(raw.clone(), sanitized.clone());
                self.by_sanitized.insert(sanitized, raw);
                Ok(())
            }
            (Some(existing), _) if *existing == sanitized => Ok(()),
            _ => Err(NameConflict { raw, sanitized }),
        }
    }

    /// Raw name for a sanitized one.
    pub fn raw(&self, sanitized: &str) -> Option<&str> {
        self.by_sanitized.get(sanitized).map(String::as_str)
    }

    /// Sanitized name for a raw one.
    pub fn sanitized(&self, raw: &str) -> Option<&str> {
        self.by_raw.get(raw).map(String::as_str)
    }

    pub fn contains_sanitized(&self, sanitized: &str) -> bool {
        self.by_sanitized.contains_key(sanitized)
    }

    /// Iterates `(raw, sanitized)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_raw.iter().map(|(r, s)| (r.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_raw.is_empty()
    }
}

impl From<NameMap> for Vec<(String, String)> {
    fn from(map: NameMap) -> Self {
        map.by_raw.into_iter().collect()
    }
}

impl TryFrom<Vec<(String, String)>> for NameMap {
    type Error = NameConflict;

    fn try_from(pairs: Vec<(String, String)>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}
