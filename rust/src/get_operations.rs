//! GET operations for the index tree and the slot store.
//!
//! This module contains all the read operations: key lookup in the tree,
//! record lookup in the store, and the read-only accessors collaborators use
//! to walk or snapshot the store.

use crate::types::{BTree, Position, SlotStore};
use std::collections::VecDeque;

impl<K: Ord> BTree<K> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get the position associated with a key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// The position if the key exists, `None` otherwise (including on an
    /// empty tree).
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// tree.insert(1, 10);
    /// assert_eq!(tree.search(&1), Some(10));
    /// assert_eq!(tree.search(&2), None);
    /// ```
    pub fn search(&self, key: &K) -> Option<Position> {
        self.root.as_ref().and_then(|root| root.search(key))
    }

    /// Check if key exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Check whether any key maps to `position`.
    ///
    /// This walks the whole tree; it is meant for validation, not hot paths.
    pub fn contains_position(&self, position: Position) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.contains_position(position))
    }
}

impl<R, K, F> SlotStore<R, K, F>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    /// Get the record stored under a primary key.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::SlotStore;
    ///
    /// let mut store = SlotStore::new(|s: &String| s.clone());
    /// store.insert("gif".to_string());
    /// assert_eq!(store.find(&"gif".to_string()), Some(&"gif".to_string()));
    /// assert_eq!(store.find(&"fabaolaf".to_string()), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<&R> {
        let position = self.index.search(key)?;
        self.records.get(position).and_then(Option::as_ref)
    }

    /// Get a mutable reference to the record stored under a primary key.
    ///
    /// The record's key must not change through this reference; if it does,
    /// the index no longer finds the record and `check_invariants` reports it.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut R> {
        let position = self.index.search(key)?;
        self.records.get_mut(position).and_then(Option::as_mut)
    }

    /// Check if a record with this key is stored.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Derive the primary key of a record with this store's extractor.
    pub fn key_of(&self, record: &R) -> K {
        (self.key_of)(record)
    }
}

impl<R, K, F> SlotStore<R, K, F> {
    /// Get the record in a slot, if the slot exists and is occupied.
    pub fn get(&self, position: Position) -> Option<&R> {
        self.records.get(position).and_then(Option::as_ref)
    }

    /// All slots in position order, holes included as `None`.
    pub fn records(&self) -> &[Option<R>] {
        &self.records
    }

    /// Free positions in the order they will be reused.
    pub fn free_slots(&self) -> &VecDeque<Position> {
        &self.free_slots
    }

    /// The primary-key index.
    pub fn index(&self) -> &BTree<K> {
        &self.index
    }

    /// Position the next insert of a new key will occupy.
    pub fn next_position(&self) -> Position {
        self.free_slots
            .front()
            .copied()
            .unwrap_or(self.records.len())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len() - self.free_slots.len()
    }

    /// Returns true if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
