//! Ordered mapping type for structured values.
//!
//! [`StructuredMap`] wraps [`IndexMap`] so mapping entries keep the order they
//! were inserted in. The renderer writes keys in exactly that order, which
//! makes output deterministic without sorting.
//!
//! ## Examples
//!
//! ```rust
//! use structured_yaml::{StructuredMap, StructuredValue};
//!
//! let mut map = StructuredMap::new();
//! map.insert("name".to_string(), StructuredValue::from("Alice"));
//! map.insert("age".to_string(), StructuredValue::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::StructuredValue;
use indexmap::IndexMap;

/// An insertion-ordered map of string keys to structured values.
///
/// # Examples
///
/// ```rust
/// use structured_yaml::{StructuredMap, StructuredValue};
///
/// let mut map = StructuredMap::new();
/// map.insert("second".to_string(), StructuredValue::from(2));
/// map.insert("first".to_string(), StructuredValue::from(1));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["second", "first"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredMap(IndexMap<String, StructuredValue>);

impl StructuredMap {
    #[must_use]
    pub fn new() -> Self {
        StructuredMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        StructuredMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// Re-inserting an existing key keeps its original position.
    pub fn insert(&mut self, key: String, value: StructuredValue) -> Option<StructuredValue> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, StructuredValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, StructuredValue> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, StructuredValue> {
        self.0.iter()
    }
}

impl IntoIterator for StructuredMap {
    type Item = (String, StructuredValue);
    type IntoIter = indexmap::map::IntoIter<String, StructuredValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StructuredMap {
    type Item = (&'a String, &'a StructuredValue);
    type IntoIter = indexmap::map::Iter<'a, String, StructuredValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, StructuredValue)> for StructuredMap {
    fn from_iter<T: IntoIterator<Item = (String, StructuredValue)>>(iter: T) -> Self {
        StructuredMap(IndexMap::from_iter(iter))
    }
}
