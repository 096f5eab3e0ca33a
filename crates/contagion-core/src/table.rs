//! Growable keyed table: an unordered collection with unique keys.
//!
//! A [`Table`] stores its elements in a contiguous buffer that grows by
//! exactly one slot per insertion and shrinks on every removal. Lookups are
//! linear scans. Uniqueness is decided by [`TableEntry::same_key`], which is
//! deliberately narrower than structural equality for composite records
//! (an infection is keyed by agent name and country name only).
//!
//! # Invariants
//!
//! - No two stored elements share a key.
//! - [`Table::len`] always equals the number of stored elements.
//! - An empty table owns no heap buffer.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// An element that can be stored in a [`Table`].
pub trait TableEntry: Clone {
    /// Whether `self` and `other` collide on the table key.
    fn same_key(&self, other: &Self) -> bool;

    /// Human-readable rendering of the key, used in errors and logs.
    fn key_label(&self) -> String;
}

/// An unordered collection of elements with unique keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<T> {
    /// Stored elements, in insertion order.
    entries: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create an empty table. No memory is allocated.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of stored elements.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the table holds no elements.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the number of slots currently allocated.
    pub const fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Iterate over the stored elements in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Return the first element matching `predicate`.
    pub fn find_by<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.entries.iter().find(|entry| predicate(entry))
    }

    /// Return a mutable reference to the first element matching `predicate`.
    pub fn find_by_mut<P>(&mut self, mut predicate: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        self.entries.iter_mut().find(|entry| predicate(entry))
    }

    /// Drop every element and release the buffer.
    ///
    /// Calling this on an already empty table is a no-op.
    pub fn clear(&mut self) {
        self.entries = Vec::new();
    }
}

impl<T: TableEntry> Table<T> {
    /// Return whether an element with the same key as `item` is stored.
    pub fn contains(&self, item: &T) -> bool {
        self.entries.iter().any(|entry| entry.same_key(item))
    }

    /// Add an element to the table.
    ///
    /// The buffer grows by exactly one slot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicated`] if an element with the same key
    /// is already stored, or [`RegistryError::Memory`] if the buffer cannot
    /// grow. In both cases the table is unchanged.
    pub fn add(&mut self, item: T) -> Result<(), RegistryError> {
        if self.contains(&item) {
            return Err(RegistryError::Duplicated(item.key_label()));
        }
        self.entries.try_reserve_exact(1)?;
        tracing::debug!(key = %item.key_label(), len = self.entries.len(), "table add");
        self.entries.push(item);
        Ok(())
    }

    /// Remove the element whose key matches `item`, returning it.
    ///
    /// Later elements shift one slot to the left and the buffer shrinks.
    /// Removing the last element releases the buffer entirely.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no element matches. The table
    /// is unchanged in that case.
    pub fn remove(&mut self, item: &T) -> Result<T, RegistryError> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.same_key(item))
            .ok_or_else(|| RegistryError::NotFound(item.key_label()))?;

        let removed = self.entries.remove(position);
        if self.entries.is_empty() {
            self.entries = Vec::new();
        } else {
            self.entries.shrink_to_fit();
        }
        tracing::debug!(key = %removed.key_label(), len = self.entries.len(), "table remove");
        Ok(removed)
    }

    /// Whether both tables hold the same set of keys, in any order.
    pub fn same_members(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|entry| self.contains(entry))
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        key: &'static str,
        payload: u32,
    }

    impl TableEntry for Tag {
        fn same_key(&self, other: &Self) -> bool {
            self.key == other.key
        }

        fn key_label(&self) -> String {
            self.key.to_owned()
        }
    }

    fn tag(key: &'static str, payload: u32) -> Tag {
        Tag { key, payload }
    }

    #[test]
    fn new_table_is_empty_and_unallocated() {
        let table: Table<Tag> = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 0);
    }

    #[test]
    fn add_grows_by_one_per_distinct_key() {
        let mut table = Table::new();
        for (n, key) in ["a", "b", "c"].into_iter().enumerate() {
            assert!(table.add(tag(key, 0)).is_ok());
            assert_eq!(table.len(), n + 1);
        }
    }

    #[test]
    fn duplicate_key_is_rejected_without_overwrite() {
        let mut table = Table::new();
        assert!(table.add(tag("a", 1)).is_ok());
        let result = table.add(tag("a", 2));
        assert!(matches!(result, Err(RegistryError::Duplicated(ref k)) if k == "a"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.find_by(|t| t.key == "a").map(|t| t.payload), Some(1));
    }

    #[test]
    fn remove_shifts_later_elements_left() {
        let mut table = Table::new();
        for key in ["a", "b", "c"] {
            assert!(table.add(tag(key, 0)).is_ok());
        }
        let removed = table.remove(&tag("a", 99));
        assert_eq!(removed.ok().map(|t| t.key), Some("a"));
        let keys: Vec<&str> = table.iter().map(|t| t.key).collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert!(table.find_by(|t| t.key == "a").is_none());
    }

    #[test]
    fn remove_missing_key_reports_not_found() {
        let mut table = Table::new();
        assert!(table.add(tag("a", 0)).is_ok());
        assert!(matches!(
            table.remove(&tag("z", 0)),
            Err(RegistryError::NotFound(_))
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removing_sole_element_releases_buffer() {
        let mut table = Table::new();
        assert!(table.add(tag("a", 0)).is_ok());
        assert!(table.remove(&tag("a", 0)).is_ok());
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 0);
    }

    #[test]
    fn clear_twice_is_harmless() {
        let mut table = Table::new();
        assert!(table.add(tag("a", 0)).is_ok());
        table.clear();
        table.clear();
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn same_members_ignores_order() {
        let mut left = Table::new();
        let mut right = Table::new();
        for key in ["a", "b"] {
            assert!(left.add(tag(key, 0)).is_ok());
        }
        for key in ["b", "a"] {
            assert!(right.add(tag(key, 7)).is_ok());
        }
        assert!(left.same_members(&right));
        assert!(right.remove(&tag("a", 0)).is_ok());
        assert!(!left.same_members(&right));
    }
}
