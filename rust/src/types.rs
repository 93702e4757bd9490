//! Core types and data structures for the store.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the index and the slot store.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest branching factor a tree accepts; smaller requests are clamped.
pub const MIN_BRANCHING: usize = 2;

/// Branching factor used when none is given.
pub const DEFAULT_BRANCHING: usize = 20;

/// Version written into every snapshot.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Index of a slot in the record array.
pub type Position = usize;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// One node of the index tree.
///
/// A node owns its children outright; there are no parent pointers. Any
/// overflow or underflow left behind by a recursive call is repaired by the
/// parent before that parent's own call returns.
///
/// Outside the crate a node is read-only; every change goes through `BTree`.
///
/// ```compile_fail
/// let node = minidb::Node::<i32>::new(3);
/// ```
///
/// ```compile_fail
/// let mut tree = minidb::BTree::new(3);
/// tree.insert(1, 10);
/// let mut node = tree.root().unwrap().clone();
/// node.insert(2, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<K> {
    /// Maximum number of children this node may have.
    pub(crate) max_branching: usize,
    /// Strictly increasing keys.
    pub(crate) keys: Vec<K>,
    /// Slot position associated with each key.
    pub(crate) values: Vec<Position>,
    /// Empty for leaves, otherwise exactly `keys.len() + 1` subtrees.
    pub(crate) children: Vec<Node<K>>,
}

/// Multiway search tree mapping primary keys to slot positions.
///
/// Every non-root node holds between `(M - 1) / 2` and `M - 1` keys, where `M`
/// is the branching factor, and all leaves sit at the same depth.
///
/// # Examples
///
/// ```
/// use minidb::BTree;
///
/// let mut tree = BTree::new(3);
/// tree.insert("b", 2);
/// tree.insert("a", 45);
/// tree.insert("c", 64);
///
/// assert_eq!(tree.search(&"a"), Some(45));
/// assert_eq!(tree.remove(&"b"), Some(2));
/// assert_eq!(tree.search(&"b"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BTree<K> {
    /// Fixed at construction, never below `MIN_BRANCHING`.
    pub(crate) max_branching: usize,
    /// Created lazily by the first insert.
    pub(crate) root: Option<Node<K>>,
    /// Number of keys in the tree.
    pub(crate) len: usize,
}

/// Record store: an array of slots indexed by primary key.
///
/// Records live in slots that never move. Removing a record leaves a hole
/// whose position joins the free list; later inserts fill holes in the order
/// they were freed before the array grows.
///
/// # Examples
///
/// ```
/// use minidb::SlotStore;
///
/// let mut store = SlotStore::new(|word: &String| word.to_lowercase());
/// store.insert("Batata".to_string());
/// store.insert("bolacha".to_string());
///
/// assert_eq!(store.find(&"batata".to_string()), Some(&"Batata".to_string()));
/// assert_eq!(store.remove(&"bolacha".to_string()), Some("bolacha".to_string()));
/// assert_eq!(store.free_slots().front(), Some(&1));
/// ```
pub struct SlotStore<R, K, F> {
    /// Slots in position order; `None` marks a hole.
    pub(crate) records: Vec<Option<R>>,
    /// Holes eligible for reuse, oldest first.
    pub(crate) free_slots: VecDeque<Position>,
    /// Primary key to slot position.
    pub(crate) index: BTree<K>,
    /// Derives a record's primary key.
    pub(crate) key_of: F,
}

/// Whole-store state as written to and read from disk.
///
/// The key extractor is code, not data, so it is supplied again when a
/// snapshot is turned back into a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot<R, K> {
    pub format_version: u32,
    pub records: Vec<Option<R>>,
    pub free_slots: VecDeque<Position>,
    pub index: BTree<K>,
}
