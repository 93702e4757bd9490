//! Construction and initialization logic for the tree, its nodes and the store.
//!
//! Branching factors below `MIN_BRANCHING` are clamped rather than rejected,
//! and a store can be seeded from an existing record collection.

use crate::types::{
    BTree, Node, SlotStore, StoreSnapshot, DEFAULT_BRANCHING, MIN_BRANCHING,
    SNAPSHOT_FORMAT_VERSION,
};
use std::collections::VecDeque;

impl<K> BTree<K> {
    /// Create an empty tree with the given branching factor.
    ///
    /// # Arguments
    ///
    /// * `max_branching` - Maximum number of children per node; values below
    ///   `MIN_BRANCHING` are raised to it
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::BTree;
    ///
    /// let tree = BTree::<i32>::new(0);
    /// assert_eq!(tree.max_branching(), 2);
    /// assert!(tree.is_empty());
    /// ```
    pub fn new(max_branching: usize) -> Self {
        Self {
            max_branching: max_branching.max(MIN_BRANCHING),
            root: None,
            len: 0,
        }
    }

    /// Create an empty tree with `DEFAULT_BRANCHING`.
    pub fn with_default_branching() -> Self {
        Self::new(DEFAULT_BRANCHING)
    }
}

impl<K> Default for BTree<K> {
    fn default() -> Self {
        Self::with_default_branching()
    }
}

impl<K> Node<K> {
    /// Creates an empty leaf.
    pub(crate) fn new(max_branching: usize) -> Self {
        Self {
            max_branching,
            keys: Vec::with_capacity(max_branching),
            values: Vec::with_capacity(max_branching),
            children: Vec::new(),
        }
    }

    /// Creates a node from its parts. `children` must be empty or hold
    /// `keys.len() + 1` nodes.
    pub(crate) fn from_parts(
        max_branching: usize,
        keys: Vec<K>,
        values: Vec<usize>,
        children: Vec<Node<K>>,
    ) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        debug_assert!(children.is_empty() || children.len() == keys.len() + 1);
        Self {
            max_branching,
            keys,
            values,
            children,
        }
    }
}

impl<R, K, F> SlotStore<R, K, F>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    /// Create an empty store indexed with `DEFAULT_BRANCHING`.
    ///
    /// # Arguments
    ///
    /// * `key_of` - Derives the primary key of a record
    pub fn new(key_of: F) -> Self {
        Self::with_branching(DEFAULT_BRANCHING, key_of)
    }

    /// Create an empty store whose index uses the given branching factor.
    pub fn with_branching(max_branching: usize, key_of: F) -> Self {
        Self {
            records: Vec::new(),
            free_slots: VecDeque::new(),
            index: BTree::new(max_branching),
            key_of,
        }
    }

    /// Create a store seeded from an existing collection.
    ///
    /// Records take slots in collection order. A record whose key was already
    /// seen is skipped, so every occupied slot stays reachable through the
    /// index.
    ///
    /// # Examples
    ///
    /// ```
    /// use minidb::SlotStore;
    ///
    /// let store = SlotStore::from_records(vec![(3, "c"), (1, "a")], |r: &(i32, &str)| r.0);
    /// assert_eq!(store.find(&1), Some(&(1, "a")));
    /// assert_eq!(store.get(0), Some(&(3, "c")));
    /// ```
    pub fn from_records<I>(records: I, key_of: F) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        Self::from_records_with_branching(DEFAULT_BRANCHING, records, key_of)
    }

    /// Same as `from_records`, with an explicit branching factor.
    pub fn from_records_with_branching<I>(max_branching: usize, records: I, key_of: F) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let mut store = Self::with_branching(max_branching, key_of);
        for record in records {
            store.insert(record);
        }
        store
    }
}

impl<R, K> StoreSnapshot<R, K> {
    /// Bundle store state under the current format version.
    pub(crate) fn new(
        records: Vec<Option<R>>,
        free_slots: VecDeque<usize>,
        index: BTree<K>,
    ) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            records,
            free_slots,
            index,
        }
    }
}
