//! Typed metadata attached to scene nodes.
//!
//! A [`NodeMetadata`] is a fixed number of ordered slots, each holding a key
//! and an optional [`MetadataValue`]. The slot count is chosen by the owner
//! when the store is created; `set` fills slots in place.
//!
//! Keys are not unique. Name lookups scan slots in order and the first
//! matching key wins.

use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::{MetadataType, MetadataValue, ValueKind, ValueVisitor};
use crate::util::{Error, Result};

/// One key/value slot.
///
/// A slot with no value is "unset": it has a key (possibly empty) but reads
/// from it fail with [`Error::Unset`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataEntry {
    key: String,
    value: Option<MetadataValue>,
}

impl MetadataEntry {
    /// Create a set entry.
    pub fn new(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Create an entry with a key but no value.
    pub fn unset(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> Option<&MetadataValue> {
        self.value.as_ref()
    }

    /// Kind of the stored value, `None` if unset.
    #[inline]
    pub fn kind(&self) -> Option<ValueKind> {
        self.value.as_ref().map(MetadataValue::kind)
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Ordered, fixed-size, type-tagged key/value store.
///
/// Uses SmallVec optimization for the common case of few entries.
#[derive(Clone, Default, PartialEq)]
pub struct NodeMetadata {
    entries: SmallVec<[MetadataEntry; 4]>,
}

impl NodeMetadata {
    /// Create a store with `count` unset slots.
    pub fn new(count: usize) -> Self {
        Self {
            entries: std::iter::repeat_with(MetadataEntry::default)
                .take(count)
                .collect(),
        }
    }

    /// Create a store sized to the given entries, keeping their order.
    pub fn from_entries(entries: impl IntoIterator<Item = MetadataEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Number of slots (set or unset).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store `value` under `key` in slot `index`, replacing whatever was there.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn set(&mut self, index: usize, key: impl Into<String>, value: impl Into<MetadataValue>) {
        let key = key.into();
        let value = value.into();
        let entry = self.slot_mut(index);

        trace!(index, key = %key, kind = %value.kind(), "set metadata");
        let new_kind = value.kind();
        if let Some(old) = entry.value.replace(value) {
            if old.kind() != new_kind {
                debug!(index, from = %old.kind(), to = %new_kind, "metadata slot changed kind");
            }
        }
        entry.key = key;
    }

    /// Return slot `index` to the unset state, handing back its value.
    ///
    /// The key is kept.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn clear(&mut self, index: usize) -> Option<MetadataValue> {
        self.slot_mut(index).value.take()
    }

    /// Read slot `index` as `T`.
    ///
    /// Fails with [`Error::TypeMismatch`] if the slot holds another kind and
    /// [`Error::Unset`] if it holds nothing.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn get<T: MetadataType>(&self, index: usize) -> Result<T> {
        let value = self.slot(index).value.as_ref().ok_or(Error::Unset { index })?;
        T::from_value(value).cloned().ok_or(Error::TypeMismatch {
            expected: T::KIND,
            actual: value.kind(),
        })
    }

    /// Read slot `index` into `out`; `out` is untouched on failure.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn get_into<T: MetadataType>(&self, index: usize, out: &mut T) -> bool {
        match self.get(index) {
            Ok(v) => {
                *out = v;
                true
            }
            Err(_) => false,
        }
    }

    /// Read the first slot whose key equals `key` as `T`.
    ///
    /// Later slots with the same key are never consulted, even when the
    /// first one has the wrong kind.
    pub fn get_by_key<T: MetadataType>(&self, key: &str) -> Result<T> {
        let index = self
            .find(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        self.get(index)
    }

    /// Name-based [`get_into`](Self::get_into).
    pub fn get_by_key_into<T: MetadataType>(&self, key: &str, out: &mut T) -> bool {
        match self.get_by_key(key) {
            Ok(v) => {
                *out = v;
                true
            }
            Err(_) => false,
        }
    }

    /// Run `visitor` on the value in slot `index` with its concrete type.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn visit<V: ValueVisitor>(&self, index: usize, visitor: V) -> Result<V::Output> {
        let value = self.slot(index).value.as_ref().ok_or(Error::Unset { index })?;
        Ok(value.visit(visitor))
    }

    /// Index of the first slot with this key.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Check if a key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn entry(&self, index: usize) -> Option<&MetadataEntry> {
        self.entries.get(index)
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.entry(index).map(MetadataEntry::key)
    }

    pub fn value(&self, index: usize) -> Option<&MetadataValue> {
        self.entry(index).and_then(MetadataEntry::value)
    }

    /// Kind stored in slot `index`; `None` if out of range or unset.
    pub fn kind(&self, index: usize) -> Option<ValueKind> {
        self.entry(index).and_then(MetadataEntry::kind)
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.entry(index).is_some_and(MetadataEntry::is_set)
    }

    /// Iterate over slots in order, unset ones included.
    pub fn iter(&self) -> std::slice::Iter<'_, MetadataEntry> {
        self.entries.iter()
    }

    #[track_caller]
    fn slot(&self, index: usize) -> &MetadataEntry {
        let count = self.entries.len();
        assert!(index < count, "metadata index {index} out of range (count: {count})");
        &self.entries[index]
    }

    #[track_caller]
    fn slot_mut(&mut self, index: usize) -> &mut MetadataEntry {
        let count = self.entries.len();
        assert!(index < count, "metadata index {index} out of range (count: {count})");
        &mut self.entries[index]
    }
}

impl fmt::Debug for NodeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a NodeMetadata {
    type Item = &'a MetadataEntry;
    type IntoIter = std::slice::Iter<'a, MetadataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for NodeMetadata
where
    K: Into<String>,
    V: Into<MetadataValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_entries(iter.into_iter().map(|(k, v)| MetadataEntry::new(k, v)))
    }
}
